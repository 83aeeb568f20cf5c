//! Deferred command builders (§4.1's option-rich requests get fluent
//! setters): a small number of operations whose options are rich enough to
//! warrant a chainable builder instead of a plain options struct argument.
//! [`glide_core_macros::request_impl`] wires each builder's `IntoFuture` impl
//! so calling `.await` directly on the builder runs it, mirroring this
//! crate's other builder-returns-self types.
//!
//! Every other operation in [`crate::client::commands::Commands`] takes its
//! options struct directly and has no builder here — this module only grows
//! when an operation's option surface earns the extra ceremony.

use bytes::Bytes;
use glide_core_macros::{option_setters, request_impl};

use crate::{
    commands::strings::{self, ConditionalSet, SetOptions},
    decoder::{ExpectedShape, Value},
    encoding::Expiry,
    error::Result,
};

use super::standalone::StandaloneClient;

pub(crate) mod private {
    /// Unreachable outside this crate — prevents downstream implementations
    /// of [`super::Action`].
    pub trait Sealed {}
}

/// Marker implemented by every deferred command builder in this module.
pub trait Action: private::Sealed {}

/// A deferred `SET`, returned by [`StandaloneClient::set`]. Chain option
/// setters, then `.await` the builder directly.
pub struct Set {
    client: StandaloneClient,
    key: Bytes,
    value: Bytes,
    options: Option<SetOptions>,
}

impl Set {
    pub(crate) fn new(client: StandaloneClient, key: Bytes, value: Bytes) -> Self {
        Set {
            client,
            key,
            value,
            options: None,
        }
    }

    option_setters! {
        options: SetOptions;
        condition: ConditionalSet,
        return_old_value: bool,
        expiry: Expiry,
    }
}

request_impl! {
    impl Action for Set {
        type Future = SetFuture;
        async fn execute(self) -> Result<Value> {
            let command = strings::set(self.key, self.value, self.options.unwrap_or_default())?;
            self.client.base().dispatch(command, ExpectedShape::Raw, None).await
        }
    }
}
