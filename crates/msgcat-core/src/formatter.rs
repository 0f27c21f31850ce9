//! Turning cataloged errors into resolved messages

use crate::cataloged_error::CatalogedError;
use crate::error::CatalogResult;
use crate::manager::{MessageCatalogManager, ResolvedMessage};

impl MessageCatalogManager {
    /// Resolve the catalog message for `error` in the default locale
    pub fn get_cataloged_error_message(&self, error: &CatalogedError) -> CatalogResult<ResolvedMessage> {
        self.get_cataloged_error_message_in(error, None)
    }

    /// Resolve the catalog message for `error` in `locale`, with default-locale fallback
    pub fn get_cataloged_error_message_in(
        &self,
        error: &CatalogedError,
        locale: Option<&str>,
    ) -> CatalogResult<ResolvedMessage> {
        self.get_message(
            error.catalog(),
            error.message_code(),
            error.named_inserts(),
            error.positional_inserts(),
            locale,
            false,
        )
    }
}
