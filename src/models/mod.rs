pub mod cinema_model;
pub mod city_model;
pub mod movie_model;
pub mod upstream_model;
