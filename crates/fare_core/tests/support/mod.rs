#![allow(dead_code)]

pub mod trips;
