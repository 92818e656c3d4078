//! Interlock coordination
//!
//! A solenoid may name peers that must never be on at the same time as it.
//! Turning it on first forces every active peer off. With a non-zero
//! interlock wait the request is then deferred: a retry is scheduled under
//! the solenoid's [`TimerKey::Interlock`](crate::timer::TimerKey) slot and
//! re-evaluates the peers when it fires, so a peer that came back on in the
//! meantime is forced off again.
//!
//! ```text
//! request(on) ──► cancel pending retry
//!                  │
//!                  ├─ any peer on? ── force peers off
//!                  │                   │
//!                  │                   ├─ wait > 0 ──► schedule retry, Deferred
//!                  │                   └─ wait = 0 ──┐
//!                  └─ no ────────────────────────────┴► drive + publish
//! ```
//!
//! Turning off never consults the interlocks, so forcing a peer off cannot
//! recurse further than one level.

mod coordinator;
