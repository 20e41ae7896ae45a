pub(crate) mod retrying;
pub(crate) mod text_generator;

pub(crate) use retrying::RetryingGenerator;
pub(crate) use text_generator::{TextGeneratorClient, TextGeneratorConfig};
