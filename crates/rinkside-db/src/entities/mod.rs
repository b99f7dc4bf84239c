//! Database entities

pub mod invoice;
pub mod player;
pub mod user;

pub use invoice::Entity as Invoice;
pub use player::Entity as Player;
pub use user::Entity as User;

pub mod prelude {
    pub use super::invoice::Entity as Invoice;
    pub use super::player::Entity as Player;
    pub use super::user::Entity as User;
}
