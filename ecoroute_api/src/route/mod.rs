pub mod optimize_route;
