//! # tgpoll-channels
//!
//! Messaging platform integrations for tgpoll.

pub mod telegram;
