pub mod fiscal;
