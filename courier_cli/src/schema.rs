use schemars::schema_for;

use crate::optimize::BatchInput;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(BatchInput))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_transports() {
        let schema: serde_json::Value =
            serde_json::from_str(&generate_json_schema().unwrap()).unwrap();

        assert_eq!(schema["title"], "BatchInput");
        assert!(schema["properties"]["transports"].is_object());
        assert!(schema["properties"]["profile"].is_object());

        let profile = serde_json::to_string(&schema["$defs"]["VehicleProfile"]).unwrap();
        assert!(profile.contains("EUR_TRUCK_40T"));
    }
}
