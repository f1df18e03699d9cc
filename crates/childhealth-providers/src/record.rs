//! Flattening registry hits into display records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub name: String,
    pub npi: String,
    pub address: String,
    pub phone: String,
    pub specialty: String,
}

/// Turn a registry response into records. A response without `results`, or
/// with `result_count` of 0, yields nothing.
pub fn format_provider_results(response: &Value) -> Vec<ProviderRecord> {
    let Some(results) = response.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };
    if response.get("result_count").and_then(Value::as_u64).unwrap_or(0) == 0 {
        return Vec::new();
    }
    results.iter().map(format_provider).collect()
}

fn format_provider(doc: &Value) -> ProviderRecord {
    let basic = &doc["basic"];

    let full_name = format!(
        "{} {}",
        basic["first_name"].as_str().unwrap_or(""),
        basic["last_name"].as_str().unwrap_or("")
    );
    let name = if full_name.trim().is_empty() {
        basic["organization_name"]
            .as_str()
            .unwrap_or("Unknown Organization")
            .to_string()
    } else {
        full_name
    };

    let npi = match &doc["number"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let (address, phone) = doc["addresses"]
        .as_array()
        .and_then(|addrs| {
            addrs
                .iter()
                .find(|a| a["address_purpose"].as_str() == Some("LOCATION"))
        })
        .map(|a| {
            let s = |k: &str| a[k].as_str().unwrap_or("").to_string();
            (
                format!("{}, {}, {} {}", s("address_1"), s("city"), s("state"), s("postal_code")),
                s("telephone_number"),
            )
        })
        .unwrap_or_else(|| ("No address found".to_string(), String::new()));

    ProviderRecord { name, npi, address, phone, specialty: specialties(&doc["taxonomies"]) }
}

/// Taxonomy descriptions, primaries first and tagged " (Primary)".
fn specialties(taxonomies: &Value) -> String {
    let mut out: Vec<String> = Vec::new();
    for t in taxonomies.as_array().into_iter().flatten() {
        let Some(desc) = t["desc"].as_str().filter(|d| !d.is_empty()) else {
            continue;
        };
        if t["primary"].as_bool().unwrap_or(false) {
            out.insert(0, format!("{desc} (Primary)"));
        } else {
            out.push(desc.to_string());
        }
    }
    if out.is_empty() {
        "No specialty listed".to_string()
    } else {
        out.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "result_count": 2,
            "results": [
                {
                    "number": 1234567890,
                    "basic": { "first_name": "JANE", "last_name": "DOE" },
                    "addresses": [
                        { "address_purpose": "MAILING", "address_1": "PO BOX 1",
                          "city": "AUSTIN", "state": "TX", "postal_code": "78701",
                          "telephone_number": "000-000-0000" },
                        { "address_purpose": "LOCATION", "address_1": "100 MAIN ST",
                          "city": "AUSTIN", "state": "TX", "postal_code": "787011234",
                          "telephone_number": "512-555-0100" }
                    ],
                    "taxonomies": [
                        { "desc": "Pediatrics", "primary": false },
                        { "desc": "Psychiatry & Neurology, Child & Adolescent Psychiatry", "primary": true }
                    ]
                },
                {
                    "number": "9876543210",
                    "basic": { "organization_name": "KIDS CLINIC LLC" },
                    "addresses": [],
                    "taxonomies": []
                }
            ]
        })
    }

    #[test]
    fn test_individual_provider() {
        let records = format_provider_results(&fixture());
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ProviderRecord {
                name: "JANE DOE".into(),
                npi: "1234567890".into(),
                address: "100 MAIN ST, AUSTIN, TX 787011234".into(),
                phone: "512-555-0100".into(),
                specialty: "Psychiatry & Neurology, Child & Adolescent Psychiatry (Primary), Pediatrics"
                    .into(),
            }
        );
    }

    #[test]
    fn test_organisation_fallbacks() {
        let records = format_provider_results(&fixture());
        let org = &records[1];
        assert_eq!(org.name, "KIDS CLINIC LLC");
        assert_eq!(org.npi, "9876543210");
        assert_eq!(org.address, "No address found");
        assert_eq!(org.phone, "");
        assert_eq!(org.specialty, "No specialty listed");
    }

    #[test]
    fn test_unknown_organisation() {
        let resp = json!({ "result_count": 1, "results": [ { "number": 1, "basic": {} } ] });
        assert_eq!(format_provider_results(&resp)[0].name, "Unknown Organization");
    }

    #[test]
    fn test_zero_count_or_missing_results() {
        assert!(format_provider_results(&json!({ "result_count": 0, "results": [] })).is_empty());
        assert!(format_provider_results(&json!({ "result_count": 3 })).is_empty());
        assert!(format_provider_results(&json!({})).is_empty());
    }
}
