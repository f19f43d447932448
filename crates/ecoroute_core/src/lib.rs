pub mod emissions;
pub mod environment;
pub mod optimizer;
pub mod route_selector;
pub mod settings;
pub mod vehicle_type;

#[cfg(test)]
pub(crate) mod test_utils;
