use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/* A section property is either a single tagged value or a list of them. */
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(String),
    List(Vec<String>),
}

/// Properties of one section, in the order the device sent them.
///
/// This is not a map on purpose: SENEC_IO_OUTPUT lists DC_SWITCH twice,
/// and both readings have to survive parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionValues(pub Vec<(String, PropertyValue)>);

impl<'de> Deserialize<'de> for SectionValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionValuesVisitor;

        impl<'de> Visitor<'de> for SectionValuesVisitor {
            type Value = SectionValues;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of tagged section properties")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut properties = Vec::new();
                while let Some(entry) = map.next_entry::<String, PropertyValue>()? {
                    properties.push(entry);
                }
                Ok(SectionValues(properties))
            }
        }

        deserializer.deserialize_map(SectionValuesVisitor)
    }
}

#[derive(Deserialize)]
struct Group {
    #[serde(rename = "SECTIONS", default)]
    sections: Vec<String>,
}

/// Section names announced by the device, flattened across all response
/// groups in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionList(pub Vec<String>);

impl<'de> Deserialize<'de> for SectionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionListVisitor;

        impl<'de> Visitor<'de> for SectionListVisitor {
            type Value = SectionList;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of section groups")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut names = Vec::new();
                while let Some((_, group)) = map.next_entry::<String, Group>()? {
                    names.extend(group.sections);
                }
                Ok(SectionList(names))
            }
        }

        deserializer.deserialize_map(SectionListVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    fn read_resource(filename: &str) -> String {
        let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        d.push(format!("resources/test/{}", filename));
        fs::read_to_string(d.as_path()).unwrap()
    }

    #[test]
    fn section_discovery_flattens_groups_in_document_order() {
        let input = read_resource("sections.json");
        let output: SectionList = serde_json::from_str(&input).unwrap();
        assert_eq!(
            vec!["st_ENERGY", "st_PV1", "st_STATISTIC", "WIZARD"],
            output.0
        );
    }

    #[test]
    fn groups_without_sections_are_ignored() {
        let output: SectionList = serde_json::from_str(r#"{"INFO":{"DEVICE":"x"}}"#).unwrap();
        assert!(output.0.is_empty());
    }

    #[test]
    fn section_values_keep_device_order() {
        let input = read_resource("energy.json");
        let mut response: HashMap<String, SectionValues> = serde_json::from_str(&input).unwrap();
        let values = response.remove("ENERGY").unwrap();

        let keys: Vec<&str> = values.0.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(
            vec![
                "STAT_STATE",
                "GUI_BAT_DATA_POWER",
                "GUI_OUT_PORT",
                "ERROR_STATE"
            ],
            keys
        );
        assert_eq!(
            PropertyValue::List(vec!["u8_01".to_string(), "u8_00".to_string()]),
            values.0[2].1
        );
    }

    #[test]
    fn duplicate_property_keys_are_preserved() {
        let input = read_resource("duplicate_keys.json");
        let mut response: HashMap<String, SectionValues> = serde_json::from_str(&input).unwrap();
        let values = response.remove("SENEC_IO_OUTPUT").unwrap();

        assert_eq!(3, values.0.len());
        assert_eq!("DC_SWITCH", values.0[0].0);
        assert_eq!("DC_SWITCH", values.0[2].0);
        assert_eq!(PropertyValue::Single("u8_01".to_string()), values.0[0].1);
        assert_eq!(PropertyValue::Single("u8_00".to_string()), values.0[2].1);
    }
}
