//! # CAPTCHA
//!
//! - [`CaptchaVerifier`]: port used by the claim service
//! - [`SiteVerifyClient`]: hCaptcha / reCAPTCHA implementation

pub mod verifier;

pub use verifier::{CaptchaProvider, CaptchaVerdict, CaptchaVerifier, SiteVerifyClient};
