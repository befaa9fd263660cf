// Question bank: job roles and their interview questions.

pub mod bank;
pub mod handlers;
pub mod models;
