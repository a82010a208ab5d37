pub mod access;
pub mod account;
pub mod activation;
pub mod email;
pub mod group;
pub mod listing;
pub mod notification;
pub mod password;
pub mod person_name;
pub mod throttle;
pub mod validation;
