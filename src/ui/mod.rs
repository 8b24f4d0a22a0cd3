/// User interface components
///
/// - Static chrome: header, intro, feature cards, footer (shell.rs)
/// - Drop zone and file picker trigger (upload.rs)
/// - Before/after split-slider viewer (comparator.rs)
pub mod comparator;
pub mod shell;
pub mod upload;
