pub mod controller;
pub mod error;
pub mod input;
pub mod presence;
pub mod session;
pub mod settings;

pub use controller::{CarpetController, ControllerAction, ViewController, ZoomPolicy};
pub use error::AppError;
pub use session::ViewerSession;
pub use settings::Settings;
