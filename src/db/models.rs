use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The whole site state, persisted as a single JSON document.
///
/// Every key defaults to empty so older files (e.g. only `posts` and
/// `staff`) still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    pub admins: Vec<Admin>,
    /// Insertion order is chronological.
    pub posts: Vec<Post>,
    pub gallery: Vec<GalleryItem>,
    pub staff: Vec<StaffMember>,
    pub social: SocialLinks,
}

/// An admin account. Usernames are unique and case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// A blog-style post shown on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Stored upload filename, if the post has an image.
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Links to the brand's social profiles. Always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
}

/// Admin as shown on the dashboard; never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: String,
    pub username: String,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id.clone(),
            username: admin.username.clone(),
        }
    }
}

/// Generate a new entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl SiteData {
    pub fn find_admin_by_username(&self, username: &str) -> Option<&Admin> {
        self.admins.iter().find(|a| a.username == username)
    }

    pub fn find_post_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn find_post_by_id_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    pub fn remove_post(&mut self, id: &str) -> Option<Post> {
        let idx = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(idx))
    }

    pub fn find_gallery_item_by_id(&self, id: &str) -> Option<&GalleryItem> {
        self.gallery.iter().find(|g| g.id == id)
    }

    pub fn find_gallery_item_by_id_mut(&mut self, id: &str) -> Option<&mut GalleryItem> {
        self.gallery.iter_mut().find(|g| g.id == id)
    }

    pub fn remove_gallery_item(&mut self, id: &str) -> Option<GalleryItem> {
        let idx = self.gallery.iter().position(|g| g.id == id)?;
        Some(self.gallery.remove(idx))
    }

    pub fn find_staff_member_by_id(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn find_staff_member_by_id_mut(&mut self, id: &str) -> Option<&mut StaffMember> {
        self.staff.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_staff_member(&mut self, id: &str) -> Option<StaffMember> {
        let idx = self.staff.iter().position(|s| s.id == id)?;
        Some(self.staff.remove(idx))
    }
}
