/// Result of decoding one tagged device value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    Number(f64),
    /// `st_` tokens carry a status string and have no numeric reading.
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownTag(String),
    InvalidPayload(String, String),
}

/// Decode a SENEC tagged value like `u3_0000002A` or `fl_42280000`.
///
/// The device encodes every reading as a three character type tag followed
/// by a hex payload of the tagged width. Integer tags carry the value
/// directly (signed tags as the two's complement bit pattern of that
/// width), `fl_` carries the bit pattern of an IEEE-754 single. A wrong
/// width or signedness here silently corrupts a whole time series, so each
/// tag is matched and parsed explicitly.
pub fn decode(token: &str) -> Result<Decoded, Error> {
    let tag = match token.get(..3) {
        Some(tag) => tag,
        None => return Err(Error::UnknownTag(token.to_string())),
    };
    let payload = &token[3..];
    let invalid =
        |e: std::num::ParseIntError| Error::InvalidPayload(token.to_string(), e.to_string());

    let value = match tag {
        "st_" => return Ok(Decoded::Status),
        "u8_" => u8::from_str_radix(payload, 16).map_err(invalid)? as f64,
        "u1_" => u16::from_str_radix(payload, 16).map_err(invalid)? as f64,
        "u3_" => u32::from_str_radix(payload, 16).map_err(invalid)? as f64,
        "u6_" => u64::from_str_radix(payload, 16).map_err(invalid)? as f64,
        "i8_" => u8::from_str_radix(payload, 16).map_err(invalid)? as i8 as f64,
        "i1_" => u16::from_str_radix(payload, 16).map_err(invalid)? as i16 as f64,
        "i3_" => u32::from_str_radix(payload, 16).map_err(invalid)? as i32 as f64,
        "i6_" => u64::from_str_radix(payload, 16).map_err(invalid)? as i64 as f64,
        "fl_" => f32::from_bits(u32::from_str_radix(payload, 16).map_err(invalid)?) as f64,
        _ => return Err(Error::UnknownTag(token.to_string())),
    };

    Ok(Decoded::Number(value))
}
