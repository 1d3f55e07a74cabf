pub mod astrometry;
pub mod builder;
pub mod constants;
pub mod conversion;
pub mod facility;
pub mod form;
pub mod gem_errors;
pub mod payload;
pub mod portal;
pub mod settings;
pub mod sites;
pub mod targets;
pub mod time;
pub mod validate;
