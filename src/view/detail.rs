//! Detail coordinator: viewing, editing, commenting on, and deleting one pin.
//!
//! Edit and delete affordances are offered only to the pin's author; the
//! check compares author and session emails in the view layer, since the
//! stores themselves trust their caller.

use crate::errors::AppError;
use crate::models::{NewComment, Pin, PinPatch, User};
use crate::store::pins::PinStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    Viewing,
    Editing,
}

pub struct DetailView {
    pin_id: String,
    mode: DetailMode,
    draft: PinPatch,
}

impl DetailView {
    /// Open a pin's detail panel in view mode.
    pub fn open(pin_id: &str) -> Self {
        Self {
            pin_id: pin_id.to_string(),
            mode: DetailMode::Viewing,
            draft: PinPatch::default(),
        }
    }

    pub fn pin_id(&self) -> &str {
        &self.pin_id
    }

    pub fn mode(&self) -> DetailMode {
        self.mode
    }

    pub fn draft(&self) -> &PinPatch {
        &self.draft
    }

    /// Whether the session user may edit or delete this pin.
    ///
    /// Pins created while logged out have no author and nobody can edit them.
    pub fn can_edit(pin: &Pin, current: Option<&User>) -> bool {
        match (&pin.author, current) {
            (Some(author), Some(user)) => author.email == user.email,
            _ => false,
        }
    }

    /// Switch to edit mode with an empty draft.
    pub fn begin_edit(&mut self, store: &PinStore, current: Option<&User>) -> Result<(), AppError> {
        let pin = self.lookup(store)?;
        if !Self::can_edit(pin, current) {
            return Err(AppError::Unauthorized(
                "Only the pin author can edit it".to_string(),
            ));
        }
        self.mode = DetailMode::Editing;
        self.draft = PinPatch::default();
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = Some(name.to_string());
    }

    pub fn set_category(&mut self, category: &str) {
        self.draft.category = Some(category.to_string());
    }

    pub fn set_color(&mut self, color: &str) {
        self.draft.color = Some(color.to_string());
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.draft.comment = Some(comment.to_string());
    }

    pub fn set_photos(&mut self, photos: Vec<String>) {
        self.draft.photos = Some(photos);
    }

    /// Commit the draft and return to view mode.
    ///
    /// An untouched draft commits nothing. On failure the draft stays so
    /// the form keeps the user's input.
    pub fn save(&mut self, store: &mut PinStore) -> Result<(), AppError> {
        if !self.draft.is_empty() {
            store.update(&self.pin_id, &self.draft)?;
        }
        self.draft = PinPatch::default();
        self.mode = DetailMode::Viewing;
        Ok(())
    }

    /// Discard the draft and return to view mode.
    pub fn cancel_edit(&mut self) {
        self.draft = PinPatch::default();
        self.mode = DetailMode::Viewing;
    }

    /// Append a comment as the logged-in user; commenting requires a session.
    pub fn add_comment(
        &self,
        store: &mut PinStore,
        user: &User,
        text: &str,
        reply_to: Option<usize>,
    ) -> Result<usize, AppError> {
        store.add_comment(
            &self.pin_id,
            &NewComment {
                text: text.to_string(),
                author: user.as_author(),
                reply_to,
            },
        )
    }

    /// Toggle the logged-in user's like on a comment.
    pub fn toggle_like(
        &self,
        store: &mut PinStore,
        user: &User,
        comment_index: usize,
    ) -> Result<(), AppError> {
        store.toggle_comment_like(&self.pin_id, comment_index, &user.email)
    }

    /// Delete the pin; offered only to its author.
    pub fn delete(self, store: &mut PinStore, current: Option<&User>) -> Result<(), AppError> {
        let pin = self.lookup(store)?;
        if !Self::can_edit(pin, current) {
            return Err(AppError::Unauthorized(
                "Only the pin author can delete it".to_string(),
            ));
        }
        store.delete(&self.pin_id)
    }

    fn lookup<'a>(&self, store: &'a PinStore) -> Result<&'a Pin, AppError> {
        store
            .get(&self.pin_id)
            .ok_or_else(|| AppError::NotFound(format!("Pin {} not found", self.pin_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, NewPin, PendingLocation};
    use crate::storage::{MemoryStorage, Storage};
    use crate::store::categories::CategoryRegistry;
    use std::sync::Arc;

    fn user(name: &str, email: &str) -> User {
        User {
            id: email.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn pin_by(author: Option<&User>) -> (PinStore, String) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let registry = CategoryRegistry::open(storage.clone());
        let mut store = PinStore::open(storage);
        let pin = store
            .create(
                &PendingLocation {
                    lat: 40.0,
                    lng: -74.0,
                    location_name: String::new(),
                },
                &NewPin {
                    name: "Viewpoint".to_string(),
                    category: "ViewPoint".to_string(),
                    ..Default::default()
                },
                &registry,
                author.map(User::as_author),
            )
            .unwrap();
        (store, pin.id)
    }

    #[test]
    fn test_only_author_can_edit() {
        let ada = user("Ada", "ada@example.com");
        let bob = user("Bob", "bob@example.com");
        let (store, id) = pin_by(Some(&ada));
        let mut view = DetailView::open(&id);

        assert!(view.begin_edit(&store, Some(&bob)).is_err());
        assert!(view.begin_edit(&store, None).is_err());
        assert!(view.begin_edit(&store, Some(&ada)).is_ok());
        assert_eq!(view.mode(), DetailMode::Editing);
    }

    #[test]
    fn test_authorless_pin_not_editable() {
        let ada = user("Ada", "ada@example.com");
        let (store, id) = pin_by(None);
        let mut view = DetailView::open(&id);
        assert!(view.begin_edit(&store, Some(&ada)).is_err());
    }

    #[test]
    fn test_save_commits_draft() {
        let ada = user("Ada", "ada@example.com");
        let (mut store, id) = pin_by(Some(&ada));
        let mut view = DetailView::open(&id);

        view.begin_edit(&store, Some(&ada)).unwrap();
        view.set_name("Sunset overlook");
        view.save(&mut store).unwrap();

        assert_eq!(store.get(&id).unwrap().name, "Sunset overlook");
        assert_eq!(view.mode(), DetailMode::Viewing);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let ada = user("Ada", "ada@example.com");
        let (mut store, id) = pin_by(Some(&ada));
        let mut view = DetailView::open(&id);

        view.begin_edit(&store, Some(&ada)).unwrap();
        view.set_name("Sunset overlook");
        view.cancel_edit();
        view.save(&mut store).unwrap();

        assert_eq!(store.get(&id).unwrap().name, "Viewpoint");
    }

    #[test]
    fn test_comment_and_like_flow() {
        let ada = user("Ada", "ada@example.com");
        let bob = user("Bob", "bob@example.com");
        let (mut store, id) = pin_by(Some(&ada));
        let view = DetailView::open(&id);

        let index = view
            .add_comment(&mut store, &bob, "Great view!", None)
            .unwrap();
        view.toggle_like(&mut store, &ada, index).unwrap();

        let comment = &store.get(&id).unwrap().comments[index];
        assert_eq!(comment.likes, vec!["ada@example.com"]);
    }

    #[test]
    fn test_delete_requires_authorship() {
        let ada = user("Ada", "ada@example.com");
        let bob = user("Bob", "bob@example.com");
        let (mut store, id) = pin_by(Some(&ada));

        assert!(DetailView::open(&id).delete(&mut store, Some(&bob)).is_err());
        assert!(store.get(&id).is_some());

        DetailView::open(&id).delete(&mut store, Some(&ada)).unwrap();
        assert!(store.get(&id).is_none());
    }
}
