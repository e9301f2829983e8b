use fixpdf_types::FixedPage;

/// Convert a top-left origin Y coordinate to PDF's bottom-left origin.
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Per-document font resource name for the `index`-th distinct font.
pub fn font_resource_name(index: usize) -> String {
    format!("F{}", index + 1)
}

/// Checks that a page can become a PDF `MediaBox`.
pub fn validate_page_size(page: &FixedPage) -> Result<(), String> {
    let ok = |v: f32| v.is_finite() && v > 0.0;
    if ok(page.width) && ok(page.height) {
        Ok(())
    } else {
        Err(format!("page size {}x{} is not positive", page.width, page.height))
    }
}
