mod error_banner;
mod header;
mod key_panel;
mod model_dropdown;
mod prompt_panel;
mod response_grid;

pub use error_banner::ErrorBanner;
pub use header::Header;
pub use key_panel::KeyPanel;
pub use model_dropdown::ModelDropdown;
pub use prompt_panel::PromptPanel;
pub use response_grid::ResponseGrid;
