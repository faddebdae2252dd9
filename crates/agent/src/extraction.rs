use serde::Deserialize;

/// Raw structured-extraction output. Every field is optional at the wire
/// level; completeness is decided afterwards by [`ExtractedOrder::into_complete`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOrder {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub governorate: Option<String>,
    pub product_code: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// An extraction that cleared the completeness gate: phone, address and
/// product code are all present and non-blank. Optional descriptors keep
/// their extracted values and default later, at order-build time.
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteExtraction {
    pub customer_name: Option<String>,
    pub customer_phone: String,
    pub address: String,
    pub governorate: Option<String>,
    pub product_code: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl ExtractedOrder {
    pub fn into_complete(self) -> Option<CompleteExtraction> {
        let customer_phone = non_blank(self.customer_phone)?;
        let address = non_blank(self.address)?;
        let product_code = non_blank(self.product_code)?;

        Some(CompleteExtraction {
            customer_name: non_blank(self.customer_name),
            customer_phone,
            address,
            governorate: non_blank(self.governorate),
            product_code,
            size: non_blank(self.size),
            color: non_blank(self.color),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::ExtractedOrder;

    fn full() -> ExtractedOrder {
        ExtractedOrder {
            customer_name: Some("أحمد".to_string()),
            customer_phone: Some("01012345678".to_string()),
            address: Some("١٢ شارع التحرير".to_string()),
            governorate: Some("القاهرة".to_string()),
            product_code: Some("TSH-001".to_string()),
            size: Some("L".to_string()),
            color: Some("أسود".to_string()),
        }
    }

    #[test]
    fn complete_extraction_keeps_every_field() {
        let complete = full().into_complete().expect("complete");
        assert_eq!(complete.customer_phone, "01012345678");
        assert_eq!(complete.product_code, "TSH-001");
        assert_eq!(complete.size.as_deref(), Some("L"));
    }

    #[test]
    fn missing_phone_is_incomplete() {
        let mut extracted = full();
        extracted.customer_phone = None;
        assert!(extracted.into_complete().is_none());
    }

    #[test]
    fn blank_address_is_incomplete() {
        let mut extracted = full();
        extracted.address = Some("   ".to_string());
        assert!(extracted.into_complete().is_none());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let extracted = ExtractedOrder {
            customer_phone: Some("01012345678".to_string()),
            address: Some("العنوان".to_string()),
            product_code: Some("TSH-001".to_string()),
            ..ExtractedOrder::default()
        };

        let complete = extracted.into_complete().expect("complete");
        assert!(complete.customer_name.is_none());
        assert!(complete.governorate.is_none());
    }

    #[test]
    fn wire_form_is_camel_case() {
        let extracted: ExtractedOrder = serde_json::from_str(
            r#"{"customerPhone":"01012345678","address":"هنا","productCode":"PNTS-02"}"#,
        )
        .expect("decode");
        assert_eq!(extracted.product_code.as_deref(), Some("PNTS-02"));
        assert!(extracted.into_complete().is_some());
    }
}
