use clap::Subcommand;
use rust_decimal::Decimal;

use dokkan_core::domain::product::{NewProduct, ProductId};
use dokkan_core::stores::CatalogStore;
use dokkan_store::snapshots;

use crate::commands::{build_runtime, load_config, open_kv, CommandResult};

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    #[command(about = "Add a product to the catalog")]
    Add {
        #[arg(long, help = "Operator-facing SKU, e.g. TSH-001")]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, help = "Unit price in EGP")]
        price: Decimal,
        #[arg(long, value_delimiter = ',', help = "Comma-separated size labels")]
        sizes: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Comma-separated color names")]
        colors: Vec<String>,
        #[arg(long, help = "Mark the product as out of stock")]
        unavailable: bool,
    },
    #[command(about = "Remove a product by its generated id")]
    Remove {
        #[arg(long)]
        id: String,
    },
    #[command(about = "Mark a product as in or out of stock")]
    Availability {
        #[arg(long)]
        id: String,
        #[arg(long, action = clap::ArgAction::Set, help = "true or false")]
        available: bool,
    },
    #[command(about = "List the catalog")]
    List,
}

pub fn run(command: ProductCommand) -> CommandResult {
    let config = match load_config("product") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("product") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let kv = match open_kv(&config).await {
            Ok(kv) => kv,
            Err(message) => return CommandResult::failure("product", "storage", message, 4),
        };
        let products = match snapshots::load_catalog(&kv).await {
            Ok(products) => products,
            Err(error) => {
                return CommandResult::failure("product", "storage", error.to_string(), 4)
            }
        };
        let mut catalog = CatalogStore::hydrate(products);

        match command {
            ProductCommand::Add { code, name, price, sizes, colors, unavailable } => {
                let draft = NewProduct {
                    code: code.clone(),
                    name,
                    price,
                    sizes,
                    colors,
                    is_available: !unavailable,
                };
                let id = match catalog.add(draft) {
                    Ok(id) => id,
                    Err(error) => {
                        return CommandResult::failure(
                            "product",
                            "domain_validation",
                            error.to_string(),
                            5,
                        );
                    }
                };
                if let Err(error) = snapshots::save_catalog(&kv, catalog.list()).await {
                    return CommandResult::failure("product", "storage", error.to_string(), 4);
                }
                CommandResult::success("product", format!("added product {code} with id {}", id.0))
            }
            ProductCommand::Remove { id } => {
                let id = ProductId(id);
                if catalog.list().iter().all(|product| product.id != id) {
                    return CommandResult::failure(
                        "product",
                        "not_found",
                        format!("no product with id {}", id.0),
                        5,
                    );
                }
                catalog.remove(&id);
                if let Err(error) = snapshots::save_catalog(&kv, catalog.list()).await {
                    return CommandResult::failure("product", "storage", error.to_string(), 4);
                }
                CommandResult::success("product", format!("removed product {}", id.0))
            }
            ProductCommand::Availability { id, available } => {
                let id = ProductId(id);
                if catalog.list().iter().all(|product| product.id != id) {
                    return CommandResult::failure(
                        "product",
                        "not_found",
                        format!("no product with id {}", id.0),
                        5,
                    );
                }
                catalog.set_availability(&id, available);
                if let Err(error) = snapshots::save_catalog(&kv, catalog.list()).await {
                    return CommandResult::failure("product", "storage", error.to_string(), 4);
                }
                CommandResult::success(
                    "product",
                    format!(
                        "product {} is now {}",
                        id.0,
                        if available { "available" } else { "unavailable" }
                    ),
                )
            }
            ProductCommand::List => {
                let lines: Vec<String> = catalog
                    .list()
                    .iter()
                    .map(|product| {
                        format!(
                            "{} | {} | {} ج.م | sizes: {} | colors: {} | {} | id: {}",
                            product.code,
                            product.name,
                            product.price,
                            product.sizes.join(","),
                            product.colors.join(","),
                            if product.is_available { "available" } else { "unavailable" },
                            product.id.0,
                        )
                    })
                    .collect();
                CommandResult::success(
                    "product",
                    if lines.is_empty() { "catalog is empty".to_string() } else { lines.join("\n") },
                )
            }
        }
    })
}
