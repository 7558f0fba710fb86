// Library for tests to access modules

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod poll;
pub mod runner;
pub mod shutdown;
pub mod sink;
pub mod teamcity;
pub mod version;
