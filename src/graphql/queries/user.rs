use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user with their saved books
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let service = ctx.data_unchecked::<Arc<BookshelfService>>();
        let profile = service.me(ctx.identity()).await.map_err(|e| e.extend())?;
        Ok(profile.into())
    }
}
