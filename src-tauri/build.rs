//! Build script for Region Snip.
//!
//! Generates the Tauri context (config, capabilities, bundled overlay page)
//! consumed by `tauri::generate_context!()`.

fn main() {
    tauri_build::build();
}
