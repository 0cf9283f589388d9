// Frame input and hand pose model backends

pub mod capture;
pub mod pose;
