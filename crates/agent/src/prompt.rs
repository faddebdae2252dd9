use std::fmt::Write as _;

use dokkan_core::domain::chat::{ChatMessage, ChatRole};
use dokkan_core::domain::product::Product;
use dokkan_core::domain::shipping::ShippingRate;

/// Shown when the reply call fails outright.
pub const REPLY_FALLBACK: &str =
    "عذراً يا فندم، حصل ضغط على النظام حالياً. ثواني وهكون مع حضرتك! 🌸";

/// Shown when the reply call succeeds but carries no text.
pub const EMPTY_REPLY_FALLBACK: &str =
    "أهلاً بك! نعتذر عن هذا الخطأ البسيط، هل يمكنك إعادة إرسال طلبك؟ ✨";

/// Builds the persona briefing: tone rules plus the live catalog and rate
/// table, re-rendered on every turn so edits show up immediately.
pub fn system_instruction(catalog: &[Product], rates: &[ShippingRate]) -> String {
    let mut inventory_info = String::new();
    for product in catalog {
        let availability = if product.is_available { "متوفر" } else { "غير متوفر حالياً" };
        let _ = writeln!(
            inventory_info,
            "كود: {}, الاسم: {}, السعر: {} ج.م, المقاسات: {}, الحالة: {}",
            product.code,
            product.name,
            product.price,
            product.sizes.join(","),
            availability,
        );
    }

    let mut shipping_info = String::new();
    for rate in rates {
        let _ = writeln!(shipping_info, "{}: {} ج.م", rate.governorate, rate.cost);
    }

    format!(
        "أنت مساعد مبيعات ذكي ومحترف لخدمة العملاء عبر واتساب.\n\
         يجب أن يكون أسلوبك:\n\
         - ودود للغاية ومرحب بالعملاء وكأنك صديق لهم.\n\
         - احترافي ومنظم في عرض الأسعار والتفاصيل.\n\
         - استخدم إيموجي مناسبة (مثل 🌸، ✨، 🚚، 🛍️) لجعل المحادثة حيوية وودودة.\n\
         - تحدث بالعامية المصرية المهذبة أو العربية الفصحى البسيطة.\n\n\
         مهامك الأساسية:\n\
         1. الرد على استفسارات المنتجات بناءً على هذه القائمة:\n{inventory_info}\n\
         2. إذا سأل العميل عن الشحن، اطلب منه المحافظة وأخبره بالتكلفة من القائمة التالية:\n{shipping_info}\n\
         3. اطلب من العميل البيانات التالية لإتمام الطلب: (رقم الهاتف، العنوان بالتفصيل، كود الصنف أو اسمه، المقاس، واللون).\n\
         4. بمجرد استلام البيانات، قم بحساب الإجمالي (سعر المنتج + الشحن) وأكد للعميل أنه سيتم التواصل معه هاتفياً للتأكيد النهائي.\n\
         5. اجعل رسائلك قصيرة ومنسقة لتناسب تطبيق واتساب."
    )
}

/// Flattens a transcript for the extraction call. Roles are labelled so the
/// model can tell the customer's claims from the assistant's.
pub fn transcript_text(transcript: &[ChatMessage]) -> String {
    transcript
        .iter()
        .map(|message| {
            let role = match message.role {
                ChatRole::User => "العميل",
                ChatRole::Assistant => "المساعد",
            };
            format!("{role}: {}", message.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn extraction_prompt(transcript_text: &str) -> String {
    format!("Extract order details from this chat in JSON format: {transcript_text}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use dokkan_core::defaults;
    use dokkan_core::domain::chat::ChatMessage;

    use super::{system_instruction, transcript_text};

    #[test]
    fn briefing_lists_every_product_and_rate() {
        let catalog = defaults::sample_catalog();
        let rates = defaults::shipping_rates();

        let briefing = system_instruction(&catalog, &rates);

        for product in &catalog {
            assert!(briefing.contains(&product.code));
            assert!(briefing.contains(&product.name));
        }
        assert!(briefing.contains("القاهرة: 50 ج.م"));
    }

    #[test]
    fn unavailable_products_are_marked() {
        let mut catalog = defaults::sample_catalog();
        catalog[0].is_available = false;
        catalog[0].price = Decimal::from(250);

        let briefing = system_instruction(&catalog, &[]);
        assert!(briefing.contains("غير متوفر حالياً"));
    }

    #[test]
    fn transcript_labels_both_roles() {
        let transcript = vec![
            ChatMessage::user("عايز تيشيرت"),
            ChatMessage::assistant("أهلاً! أي مقاس؟ 🌸"),
        ];

        let text = transcript_text(&transcript);
        assert_eq!(text, "العميل: عايز تيشيرت\nالمساعد: أهلاً! أي مقاس؟ 🌸");
    }
}
