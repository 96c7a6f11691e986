pub mod agent;
pub mod config;
pub mod digest;

pub mod tools {
    pub mod newsapi;
    pub mod slack;
}
