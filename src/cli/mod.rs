//! # CLI Module
//!
//! Command bodies of the `titled` binary. Each command talks to the
//! library through [`TitledService`](crate::service::TitledService) and
//! reports to the terminal with the console macros (`info!`, `success!`,
//! `warning!`, `error!`).
//!
//! - [`serve`] runs the web front end.
//! - [`generate`] builds a sample playlist for a stored user from the
//!   terminal, with a spinner while tracks are resolved.
//! - [`users`] lists the users that signed in through the web front end.
//!
//! ```bash
//! titled serve --open
//! titled users
//! titled generate https://open.spotify.com/album/2P2Xwvh2xWXIZ1OWY9S9o5 --user eric
//! ```

mod generate;
mod serve;
mod users;

pub use generate::generate;
pub use serve::serve;
pub use users::users;
