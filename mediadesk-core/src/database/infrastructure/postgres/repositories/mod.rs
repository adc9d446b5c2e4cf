pub mod works;
