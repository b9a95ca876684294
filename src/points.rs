use crate::api::response::{PropertyValue, SectionValues};
use crate::decode::{self, Decoded};
use crate::model::{Datapoint, Section};

/// Turn one section's decoded properties into carbon datapoints.
///
/// Array properties expand into one datapoint per element with a 0-based
/// index suffix. Status tokens are dropped, a token that fails to decode
/// only costs that one field, and non-finite readings never leave here.
pub fn build(
    prefix: &str,
    section: &Section,
    values: &SectionValues,
    timestamp: u64,
) -> Vec<Datapoint> {
    let mut points = Vec::new();

    for (key, value) in &values.0 {
        let name = format!("{}.{}.{}", prefix, section.name, key).to_lowercase();
        match value {
            PropertyValue::Single(token) => append(&mut points, name, token, timestamp),
            PropertyValue::List(tokens) => {
                for (index, token) in tokens.iter().enumerate() {
                    append(&mut points, format!("{}.{}", name, index), token, timestamp);
                }
            }
        }
    }

    points
}

fn append(points: &mut Vec<Datapoint>, name: String, token: &str, timestamp: u64) {
    match decode::decode(token) {
        Ok(Decoded::Number(value)) if value.is_finite() => points.push(Datapoint {
            name,
            value,
            timestamp,
        }),
        Ok(Decoded::Number(value)) => {
            log::debug!("Dropping non-finite reading {}: {}", name, value)
        }
        Ok(Decoded::Status) => { /* status string, not a metric */ }
        Err(e) => log::warn!("Unable to decode {}: {:?}", name, e),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn section(name: &str) -> Section {
        Section {
            name: name.to_string(),
        }
    }

    fn single(key: &str, token: &str) -> (String, PropertyValue) {
        (key.to_string(), PropertyValue::Single(token.to_string()))
    }

    #[test]
    fn names_are_prefixed_and_lowercased() {
        let values = SectionValues(vec![single("STAT_STATE", "u8_0D")]);
        let points = build("Senec", &section("ENERGY"), &values, 1700000000);

        assert_eq!(1, points.len());
        assert_eq!("senec.energy.stat_state", points[0].name);
        assert_eq!(13.0, points[0].value);
        assert_eq!(1700000000, points[0].timestamp);
    }

    #[test]
    fn list_elements_get_increasing_index_suffixes() {
        let values = SectionValues(vec![(
            "GUI_OUT_PORT".to_string(),
            PropertyValue::List(vec![
                "u8_01".to_string(),
                "u8_00".to_string(),
                "u8_02".to_string(),
            ]),
        )]);
        let points = build("senec", &section("ENERGY"), &values, 1);

        let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            vec![
                "senec.energy.gui_out_port.0",
                "senec.energy.gui_out_port.1",
                "senec.energy.gui_out_port.2"
            ],
            names
        );
        assert_eq!(
            vec![1.0, 0.0, 2.0],
            points.iter().map(|p| p.value).collect::<Vec<f64>>()
        );
    }

    #[test]
    fn status_tokens_are_dropped_silently() {
        let values = SectionValues(vec![
            single("ERROR_STATE", "st_OK"),
            single("STAT_STATE", "u8_0D"),
        ]);
        let points = build("senec", &section("ENERGY"), &values, 1);

        assert_eq!(1, points.len());
        assert_eq!("senec.energy.stat_state", points[0].name);
    }

    #[test]
    fn non_finite_readings_are_filtered() {
        let values = SectionValues(vec![
            single("A", "fl_7FC00000"), /* NaN */
            single("B", "fl_7F800000"), /* +inf */
            single("C", "fl_42280000"),
        ]);
        let points = build("senec", &section("PV1"), &values, 1);

        assert_eq!(1, points.len());
        assert_eq!("senec.pv1.c", points[0].name);
        assert_eq!(42.0625, points[0].value);
    }

    #[test]
    fn one_bad_token_does_not_poison_the_section() {
        let values = SectionValues(vec![
            single("STAT_STATE", "u8_0D"),
            single("BROKEN", "zz_00"),
            single("GUI_BAT_DATA_POWER", "fl_42280000"),
        ]);
        let points = build("senec", &section("ENERGY"), &values, 1);

        let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            vec!["senec.energy.stat_state", "senec.energy.gui_bat_data_power"],
            names
        );
    }

    #[test]
    fn duplicate_keys_yield_one_point_each() {
        let values = SectionValues(vec![
            single("DC_SWITCH", "u8_01"),
            single("DC_SWITCH", "u8_00"),
        ]);
        let points = build("senec", &section("SENEC_IO_OUTPUT"), &values, 1);

        assert_eq!(2, points.len());
        assert_eq!("senec.senec_io_output.dc_switch", points[0].name);
        assert_eq!(1.0, points[0].value);
        assert_eq!("senec.senec_io_output.dc_switch", points[1].name);
        assert_eq!(0.0, points[1].value);
    }
}
