use marketplace_profit::config::loader::{load_carriers_dir, load_marketplace, load_marketplaces_dir};
use marketplace_profit::{
    render_report, AppConfig, Catalog, ProfitCalculator, ProfitError, ProfitRequest, ReportFormat,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SIMPLE_MARKETPLACE: &str = r#"{
    "name": "NAME",
    "tiers": {"standard": {"name": "Standard", "fees": {
        "commission": {"type": "percentage", "application": "per_item", "percentage": 10}
    }}}
}"#;

fn write_marketplace(dir: &Path, file: &str, name: &str) {
    fs::write(dir.join(file), SIMPLE_MARKETPLACE.replace("NAME", name)).unwrap();
}

#[test]
fn test_directory_load_is_sorted_by_file_name() {
    let temp_dir = TempDir::new().unwrap();
    write_marketplace(temp_dir.path(), "b_mercari.json", "Mercari");
    write_marketplace(temp_dir.path(), "a_poshmark.json", "Poshmark");
    fs::write(temp_dir.path().join("notes.txt"), "not a marketplace").unwrap();

    let marketplaces = load_marketplaces_dir(temp_dir.path()).unwrap();
    let names: Vec<&str> = marketplaces.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Poshmark", "Mercari"]);
}

#[test]
fn test_duplicate_names_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_marketplace(temp_dir.path(), "one.json", "Mercari");
    write_marketplace(temp_dir.path(), "two.json", "Mercari");

    assert!(matches!(
        load_marketplaces_dir(temp_dir.path()),
        Err(ProfitError::ConfigError { .. })
    ));
}

#[test]
fn test_missing_directory_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");
    assert!(matches!(
        load_carriers_dir(&missing),
        Err(ProfitError::ConfigError { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        load_marketplace(temp_dir.path().join("absent.json")),
        Err(ProfitError::IoError(_))
    ));
}

#[test]
fn test_catalog_from_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let marketplaces = temp_dir.path().join("marketplaces");
    let shipping = temp_dir.path().join("shipping");
    fs::create_dir_all(&marketplaces).unwrap();
    fs::create_dir_all(&shipping).unwrap();

    write_marketplace(&marketplaces, "mercari.json", "Mercari");
    fs::write(
        shipping.join("pirate.json"),
        r#"{"name": "Pirate Ship", "services": {"simple": {
            "name": "Simple Export", "weight_limits": {"min": 0, "max": 64},
            "rates": [{"weight_up_to": 64, "price": 8.0}]
        }}}"#,
    )
    .unwrap();

    let config = AppConfig::from_toml_str(&format!(
        "[data]\nmarketplaces_dir = {:?}\nshipping_dir = {:?}\n",
        marketplaces.to_str().unwrap(),
        shipping.to_str().unwrap()
    ))
    .unwrap();

    let catalog = Catalog::load(&config).unwrap();
    assert!(catalog.marketplace("Mercari").is_ok());
    assert!(catalog.carrier("Pirate Ship").is_ok());
    match catalog.carrier("FedEx") {
        Err(ProfitError::UnknownCarrier { available, .. }) => {
            assert_eq!(available, vec!["Pirate Ship".to_string()])
        }
        other => panic!("expected UnknownCarrier, got {:?}", other),
    }
}

#[test]
fn test_bundled_sample_data() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let config = AppConfig::from_toml_str(&format!(
        "[data]\nmarketplaces_dir = {:?}\nshipping_dir = {:?}\n",
        root.join("marketplaces").to_str().unwrap(),
        root.join("shipping").to_str().unwrap()
    ))
    .unwrap();

    let catalog = Catalog::load(&config).unwrap();
    let ebay = catalog.marketplace("eBay").unwrap();
    let usps = catalog.carrier("USPS").unwrap();

    let request = ProfitRequest {
        sale_price: 25.0,
        quantity: 2,
        cost_per_item: 8.0,
        weight_per_item: 6.0,
        tier_id: "standard".to_string(),
        shipping_service_id: "ground_advantage".to_string(),
        manual_shipping_price: None,
    };
    let result = ProfitCalculator::new(ebay, usps)
        .calculate_profit(&request)
        .unwrap();

    // 12 oz total lands in the 12 oz band.
    assert!((result.shipping_cost - 6.55).abs() < 1e-9);
    let report = render_report(&result, ReportFormat::Text).unwrap();
    assert!(report.contains("Shipping Cost: $6.55"));
    assert!(report.contains("final_value"));
}
