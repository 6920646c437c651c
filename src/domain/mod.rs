pub mod city;
pub mod livability;
pub mod recommendations;
pub mod report;
pub mod states;
