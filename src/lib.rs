#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use ml_cfg as cfg;
pub use ml_reflect as reflect;
