//! Command-line value parsers

use unshade_core::Selection;

/// Parse a selection rectangle from "left,top,width,height" with each
/// component in `[0,1]`.
pub fn parse_selection(s: &str) -> Result<Selection, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Invalid selection \"{}\". Expected left,top,width,height",
            s
        ));
    }

    let mut values = [0.0f32; 4];
    for (slot, part) in values.iter_mut().zip(parts.iter()) {
        *slot = part
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid selection component \"{}\"", part.trim()))?;
        if !(0.0..=1.0).contains(slot) {
            return Err(format!(
                "Selection component {} out of range; must be within 0..1",
                slot
            ));
        }
    }

    Ok(Selection {
        left: values[0],
        top: values[1],
        width: values[2],
        height: values[3],
    })
}

/// Parse a strength value, enforcing the `[0,1]` range.
pub fn parse_strength(s: &str) -> Result<f32, String> {
    let value = s
        .parse::<f32>()
        .map_err(|_| format!("Invalid strength \"{}\"", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Strength {} out of range; must be within 0..1", value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let sel = parse_selection("0.1,0.2,0.5,0.25").unwrap();
        assert_eq!(sel.left, 0.1);
        assert_eq!(sel.top, 0.2);
        assert_eq!(sel.width, 0.5);
        assert_eq!(sel.height, 0.25);

        assert!(parse_selection("0.1,0.2,0.5").is_err());
        assert!(parse_selection("0.1,0.2,0.5,abc").is_err());
        assert!(parse_selection("0.1,0.2,0.5,1.5").is_err());
    }

    #[test]
    fn test_parse_selection_with_spaces() {
        assert!(parse_selection("0.0, 0.0, 1.0, 1.0").is_ok());
    }

    #[test]
    fn test_parse_strength() {
        assert_eq!(parse_strength("0.75").unwrap(), 0.75);
        assert!(parse_strength("1.01").is_err());
        assert!(parse_strength("-0.1").is_err());
        assert!(parse_strength("strong").is_err());
    }
}
