pub mod converter;
pub mod dispatcher;
pub mod executor;
pub mod metrics;
pub mod pipeline;
pub mod renderer;

pub use converter::{CommandConverter, Converter};
pub use dispatcher::{CommandDispatcher, Dispatcher};
pub use executor::{CommandError, CommandExecutor, CommandTemplate};
pub use metrics::{get_metrics, init_metrics, record_print_outcome};
pub use pipeline::PrintPipeline;
pub use renderer::Renderer;
