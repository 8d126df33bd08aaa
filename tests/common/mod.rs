#![allow(dead_code)]

pub mod pages;
pub mod providers;
