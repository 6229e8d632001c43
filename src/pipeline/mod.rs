// Multi-step workflows built on the vendor clients and feeds.

pub mod sweep;
