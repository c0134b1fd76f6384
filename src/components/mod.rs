pub mod nodel;
