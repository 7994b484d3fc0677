#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: u64,
    pub title: String,
    pub authors: Vec<String>,
    pub year: u16,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    pub id: u64,
    pub title: String,
    pub members: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    pub id: u64,
    pub name: String,
    pub affiliation: String,
    pub field: String,
    pub status: FriendStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VaultTab {
    #[default]
    Documents,
    Discussions,
    Friends,
}

impl VaultTab {
    pub const ALL: [VaultTab; 3] = [Self::Documents, Self::Discussions, Self::Friends];

    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Discussions => "Discussions",
            Self::Friends => "Friends",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Documents => Self::Discussions,
            Self::Discussions => Self::Friends,
            Self::Friends => Self::Documents,
        }
    }
}

/// In-memory researcher workspace.
#[derive(Debug, Clone, Default)]
pub struct Vault {
    pub documents: Vec<Document>,
    pub discussions: Vec<Discussion>,
    pub friends: Vec<Friend>,
}

impl Vault {
    pub fn sample() -> Self {
        let document = |id, title: &str, authors: &[&str], year, tags: &[&str]| Document {
            id,
            title: title.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            year,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        let discussion = |id, title: &str, members| Discussion {
            id,
            title: title.to_string(),
            members,
        };
        let friend = |id, name: &str, affiliation: &str, field: &str, status| Friend {
            id,
            name: name.to_string(),
            affiliation: affiliation.to_string(),
            field: field.to_string(),
            status,
        };
        Self {
            documents: vec![
                document(
                    1,
                    "Attention Is All You Need",
                    &["Vaswani", "Shazeer", "Parmar"],
                    2017,
                    &["transformers"],
                ),
                document(
                    2,
                    "Deep Residual Learning for Image Recognition",
                    &["He", "Zhang", "Ren", "Sun"],
                    2016,
                    &["vision"],
                ),
                document(
                    3,
                    "A Mathematical Theory of Communication",
                    &["Shannon"],
                    1948,
                    &["information-theory"],
                ),
            ],
            discussions: vec![
                discussion(1, "Reading group: diffusion models", 8),
                discussion(2, "Thesis writing support", 14),
            ],
            friends: vec![
                friend(
                    1,
                    "Ada Lovelace",
                    "University of London",
                    "Analytical engines",
                    FriendStatus::Accepted,
                ),
                friend(
                    2,
                    "Alan Turing",
                    "University of Manchester",
                    "Computability",
                    FriendStatus::Pending,
                ),
            ],
        }
    }

    pub fn len(&self, tab: VaultTab) -> usize {
        match tab {
            VaultTab::Documents => self.documents.len(),
            VaultTab::Discussions => self.discussions.len(),
            VaultTab::Friends => self.friends.len(),
        }
    }

    pub fn document(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn discussion(&self, id: u64) -> Option<&Discussion> {
        self.discussions.iter().find(|thread| thread.id == id)
    }

    pub fn friend(&self, id: u64) -> Option<&Friend> {
        self.friends.iter().find(|friend| friend.id == id)
    }

    pub fn delete_document(&mut self, id: u64) -> Option<Document> {
        let index = self.documents.iter().position(|doc| doc.id == id)?;
        Some(self.documents.remove(index))
    }

    pub fn rename_document(&mut self, id: u64, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.documents.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Tags are lowercased; duplicates are ignored.
    pub fn tag_document(&mut self, id: u64, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return false;
        }
        let Some(doc) = self.documents.iter_mut().find(|doc| doc.id == id) else {
            return false;
        };
        if doc.tags.contains(&tag) {
            return false;
        }
        doc.tags.push(tag);
        true
    }

    pub fn leave_discussion(&mut self, id: u64) -> Option<Discussion> {
        let index = self.discussions.iter().position(|thread| thread.id == id)?;
        Some(self.discussions.remove(index))
    }

    pub fn accept_friend(&mut self, id: u64) -> bool {
        match self
            .friends
            .iter_mut()
            .find(|friend| friend.id == id && friend.status == FriendStatus::Pending)
        {
            Some(friend) => {
                friend.status = FriendStatus::Accepted;
                true
            }
            None => false,
        }
    }

    pub fn decline_friend(&mut self, id: u64) -> Option<Friend> {
        let index = self
            .friends
            .iter()
            .position(|friend| friend.id == id && friend.status == FriendStatus::Pending)?;
        Some(self.friends.remove(index))
    }
}
