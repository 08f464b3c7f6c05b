//! Color normalization for fills and fonts.
//!
//! Report cells carry colors as ARGB or RGB hex; indexed colors from the
//! legacy palette show up in files produced by older writer libraries.

/// Excel's 64 indexed colors (legacy palette)
const INDEXED_COLORS: [&str; 64] = [
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#800000", "#008000", "#000080", "#808000", "#800080", "#008080", "#C0C0C0", "#808080",
    "#9999FF", "#993366", "#FFFFCC", "#CCFFFF", "#660066", "#FF8080", "#0066CC", "#CCCCFF",
    "#000080", "#FF00FF", "#FFFF00", "#00FFFF", "#800080", "#800000", "#008080", "#0000FF",
    "#00CCFF", "#CCFFFF", "#CCFFCC", "#FFFF99", "#99CCFF", "#FF99CC", "#CC99FF", "#FFCC99",
    "#3366FF", "#33CCCC", "#99CC00", "#FFCC00", "#FF9900", "#FF6600", "#666699", "#969696",
    "#003366", "#339966", "#003300", "#333300", "#993300", "#993366", "#333399", "#333333",
];

/// Normalize an `rgb` attribute value to a `#RRGGBB` string.
///
/// Excel writes ARGB (8 hex digits); the alpha byte is dropped. A leading
/// `#` is tolerated. Anything that is not 6 or 8 hex digits yields `None`.
pub fn rgb_to_hex(raw: &str) -> Option<String> {
    let hex = raw.trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => hex.get(2..).map(|rgb| format!("#{}", rgb.to_uppercase())),
        6 => Some(format!("#{}", hex.to_uppercase())),
        _ => None,
    }
}

/// Resolve a legacy indexed color to `#RRGGBB`.
///
/// Index 64 is the "system foreground" slot and maps to black.
pub fn indexed_to_hex(index: u32) -> Option<String> {
    if index == 64 {
        return Some("#000000".to_string());
    }
    INDEXED_COLORS
        .get(index as usize)
        .map(|c| (*c).to_string())
}
