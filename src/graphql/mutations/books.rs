use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Save a book to the current user's list. Saving a book twice is a no-op.
    async fn save_book(&self, ctx: &Context<'_>, input: BookInput) -> Result<User> {
        let service = ctx.data_unchecked::<Arc<BookshelfService>>();
        let profile = service
            .save_book(ctx.identity(), input.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(profile.into())
    }

    /// Remove a book from the current user's list
    async fn remove_book(&self, ctx: &Context<'_>, book_id: String) -> Result<User> {
        let service = ctx.data_unchecked::<Arc<BookshelfService>>();
        let profile = service
            .remove_book(ctx.identity(), &book_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(profile.into())
    }
}
