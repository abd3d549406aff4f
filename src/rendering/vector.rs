//! SVG rendering of the car placeholder from a fixed template

/// The placeholder as SVG markup. `{brand}` and `{model}` are replaced
/// verbatim by [`render_svg`].
pub const SVG_TEMPLATE: &str = r##"<svg width="800" height="600" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" style="stop-color:#E8F4FD;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#B8D4F0;stop-opacity:1" />
    </linearGradient>
  </defs>

  <!-- Background -->
  <rect width="800" height="600" fill="url(#bg)"/>

  <!-- Car body -->
  <rect x="150" y="300" width="500" height="150" fill="#2E86AB" stroke="#1B4F72" stroke-width="3"/>

  <!-- Car roof -->
  <polygon points="200,300 400,200 600,300" fill="#1B4F72"/>

  <!-- Wheels -->
  <circle cx="200" cy="450" r="30" fill="#2C3E50" stroke="#1B4F72" stroke-width="2"/>
  <circle cx="600" cy="450" r="30" fill="#2C3E50" stroke="#1B4F72" stroke-width="2"/>

  <!-- Headlights -->
  <circle cx="160" cy="330" r="15" fill="#F39C12" stroke="#E67E22" stroke-width="2"/>
  <circle cx="640" cy="330" r="15" fill="#F39C12" stroke="#E67E22" stroke-width="2"/>

  <!-- Windows -->
  <rect x="220" y="220" width="360" height="80" fill="#85C1E9" stroke="#1B4F72" stroke-width="2"/>

  <!-- Text -->
  <text x="400" y="100" text-anchor="middle" font-family="Arial, sans-serif" font-size="48" font-weight="bold" fill="#1B4F72">{brand}</text>
  <text x="400" y="140" text-anchor="middle" font-family="Arial, sans-serif" font-size="24" fill="#34495E">{model}</text>
</svg>"##;

/// Substitute brand and model into [`SVG_TEMPLATE`]. No escaping is applied;
/// callers pass markup-safe text (see [`has_markup_chars`]).
pub fn render_svg(brand: &str, model: &str) -> String {
    let mut svg = String::with_capacity(SVG_TEMPLATE.len() + brand.len() + model.len());
    // only the template is scanned; substituted text is never looked at again
    let mut rest = SVG_TEMPLATE;
    while let Some(start) = rest.find('{') {
        svg.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{brand}") {
            svg.push_str(brand);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{model}") {
            svg.push_str(model);
            rest = after;
        } else {
            svg.push('{');
            rest = &tail[1..];
        }
    }
    svg.push_str(rest);
    svg
}

/// True when `text` contains characters with meaning in XML markup.
pub fn has_markup_chars(text: &str) -> bool {
    text.contains(['<', '>', '&', '"', '\''])
}
