//! Human-readable names for PCL command kinds.
//!
//! The catalog maps a command's classification (group character, parameter
//! character and terminator) to a display name. It is built once, on first
//! use, and never mutated. Lookups are pure; the "Unknown PCL-Command"
//! fallback for missing entries lives on
//! [`ParameterizedCommand::description`](crate::ParameterizedCommand::description),
//! not here.
//!
//! A second, much smaller tier holds proprietary vendor commands that share
//! a classification with ordinary commands and are told apart by the shape
//! of their value (a bracketed marker instead of a number).

use std::collections::HashMap;
use std::sync::OnceLock;

/// Classification key: group, parameter (0 when absent), terminator.
type Key = (u8, u8, u8);

/// Standard PCL 5 command names, keyed by short form.
const NAMES: &[(&str, &str)] = &[
    ("%A", "Enter PCL Mode"),
    ("%B", "Enter HP-GL/2 Mode"),
    ("%X", "Universal Exit Language"),
    ("&aC", "Horizontal Cursor Position (Columns)"),
    ("&aG", "Duplex Page Side Selection"),
    ("&aH", "Horizontal Cursor Position (Decipoints)"),
    ("&aL", "Left Margin"),
    ("&aM", "Right Margin"),
    ("&aP", "Print Direction"),
    ("&aR", "Vertical Cursor Position (Rows)"),
    ("&aV", "Vertical Cursor Position (Decipoints)"),
    ("&bM", "Monochrome Print Mode"),
    ("&bW", "Configuration (I/O)"),
    ("&d@", "Disable Underline"),
    ("&dD", "Enable Underline"),
    ("&fS", "Push/Pop Cursor Position"),
    ("&fX", "Macro Control"),
    ("&fY", "Macro ID"),
    ("&kG", "Line Termination"),
    ("&kH", "Horizontal Motion Index"),
    ("&kS", "Pitch"),
    ("&lA", "Page Size"),
    ("&lC", "Vertical Motion Index"),
    ("&lD", "Line Spacing"),
    ("&lE", "Top Margin"),
    ("&lF", "Text Length"),
    ("&lG", "Output Bin"),
    ("&lH", "Paper Source"),
    ("&lL", "Perforation Skip"),
    ("&lM", "Media Type"),
    ("&lO", "Orientation"),
    ("&lP", "Page Length"),
    ("&lS", "Simplex/Duplex Print"),
    ("&lT", "Job Separation"),
    ("&lU", "Left Offset Registration"),
    ("&lX", "Number of Copies"),
    ("&lZ", "Top Offset Registration"),
    ("&nW", "Alphanumeric ID"),
    ("&pC", "Palette Control"),
    ("&pI", "Palette Control ID"),
    ("&pS", "Select Palette"),
    ("&pX", "Transparent Print Data"),
    ("&rF", "Flush All Pages"),
    ("&sC", "End-of-Line Wrap"),
    ("&tP", "Text Parsing Method"),
    ("&uD", "Unit of Measure"),
    ("(@", "Primary Font: Default"),
    ("(X", "Primary Font: Select by ID"),
    ("(fW", "Define Symbol Set"),
    ("(sB", "Primary Stroke Weight"),
    ("(sH", "Primary Pitch"),
    ("(sP", "Primary Spacing"),
    ("(sS", "Primary Style"),
    ("(sT", "Primary Typeface"),
    ("(sV", "Primary Height"),
    ("(sW", "Character Data"),
    (")@", "Secondary Font: Default"),
    (")X", "Secondary Font: Select by ID"),
    (")sB", "Secondary Stroke Weight"),
    (")sH", "Secondary Pitch"),
    (")sP", "Secondary Spacing"),
    (")sS", "Secondary Style"),
    (")sT", "Secondary Typeface"),
    (")sV", "Secondary Height"),
    (")sW", "Font Header"),
    ("*bM", "Raster Compression Method"),
    ("*bV", "Transfer Raster Data by Plane"),
    ("*bW", "Transfer Raster Data by Row"),
    ("*bY", "Raster Y Offset"),
    ("*cD", "Font ID"),
    ("*cE", "Character Code"),
    ("*cF", "Font Control"),
    ("*cG", "Pattern ID"),
    ("*cK", "HP-GL/2 Plot Horizontal Size"),
    ("*cL", "HP-GL/2 Plot Vertical Size"),
    ("*cQ", "Pattern Control"),
    ("*cT", "Set Picture Frame Anchor Point"),
    ("*cW", "User-Defined Pattern"),
    ("*cX", "Horizontal Picture Frame Size (Decipoints)"),
    ("*cY", "Vertical Picture Frame Size (Decipoints)"),
    ("*gW", "Configure Raster Data"),
    ("*lO", "Logical Operation"),
    ("*mW", "Download Dither Matrix"),
    ("*pX", "Horizontal Cursor Position (PCL Units)"),
    ("*pY", "Vertical Cursor Position (PCL Units)"),
    ("*rA", "Start Raster Graphics"),
    ("*rB", "End Raster Graphics"),
    ("*rC", "End Raster Graphics"),
    ("*rF", "Raster Graphics Presentation"),
    ("*rS", "Raster Width (Source)"),
    ("*rT", "Raster Height (Source)"),
    ("*rU", "Simple Color"),
    ("*tH", "Destination Raster Width"),
    ("*tJ", "Render Algorithm"),
    ("*tR", "Raster Graphics Resolution"),
    ("*tV", "Destination Raster Height"),
    ("*vA", "Color Component One"),
    ("*vB", "Color Component Two"),
    ("*vC", "Color Component Three"),
    ("*vI", "Assign Color Index"),
    ("*vN", "Source Transparency Mode"),
    ("*vO", "Pattern Transparency Mode"),
    ("*vS", "Foreground Color"),
    ("*vT", "Select Current Pattern"),
    ("*vW", "Configure Image Data"),
];

/// Vendor commands distinguished from the standard tier by a bracketed
/// value marker under the same classification.
const VENDOR_NAMES: &[(&str, &str)] = &[("&pA", "ImageStream Data Container")];

fn key_of(short_form: &str) -> Key {
    match short_form.as_bytes() {
        [group, terminator] => (*group, 0, *terminator),
        [group, parameter, terminator] => (*group, *parameter, *terminator),
        other => unreachable!("malformed catalog short form {other:?}"),
    }
}

fn table() -> &'static HashMap<Key, &'static str> {
    static TABLE: OnceLock<HashMap<Key, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| NAMES.iter().map(|(form, name)| (key_of(form), *name)).collect())
}

fn vendor_table() -> &'static HashMap<Key, &'static str> {
    static TABLE: OnceLock<HashMap<Key, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        VENDOR_NAMES
            .iter()
            .map(|(form, name)| (key_of(form), *name))
            .collect()
    })
}

/// Looks up the display name for a classification. `vendor_value` selects
/// the vendor tier first; a miss there falls through to the standard tier.
/// `None` means the classification is unknown to the catalog.
pub fn lookup(
    group: u8,
    parameter: Option<u8>,
    terminator: u8,
    vendor_value: bool,
) -> Option<&'static str> {
    let key = (group, parameter.unwrap_or(0), terminator);
    if vendor_value {
        if let Some(name) = vendor_table().get(&key) {
            return Some(name);
        }
    }
    table().get(&key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup() {
        assert_eq!(lookup(b'&', Some(b'l'), b'S', false), Some("Simplex/Duplex Print"));
        assert_eq!(lookup(b'&', Some(b'p'), b'X', false), Some("Transparent Print Data"));
        assert_eq!(lookup(b'*', Some(b'r'), b'A', false), Some("Start Raster Graphics"));
    }

    #[test]
    fn test_absent_parameter_lookup() {
        assert_eq!(lookup(b'%', None, b'X', false), Some("Universal Exit Language"));
        assert_eq!(lookup(b'(', None, b'X', false), Some("Primary Font: Select by ID"));
    }

    #[test]
    fn test_unknown_classification() {
        assert_eq!(lookup(b'*', Some(b't'), b'Z', false), None);
    }

    #[test]
    fn test_vendor_tier() {
        assert_eq!(
            lookup(b'&', Some(b'p'), b'A', true),
            Some("ImageStream Data Container")
        );
        // A numeric value under the same classification misses the vendor
        // tier and, with no standard entry, the whole catalog.
        assert_eq!(lookup(b'&', Some(b'p'), b'A', false), None);
        // A vendor-shaped value with no vendor entry falls through.
        assert_eq!(lookup(b'&', Some(b'l'), b'S', true), Some("Simplex/Duplex Print"));
    }

    #[test]
    fn test_all_short_forms_are_well_formed() {
        for (form, _) in NAMES.iter().chain(VENDOR_NAMES) {
            assert!(matches!(form.len(), 2 | 3), "bad short form {form}");
        }
    }
}
