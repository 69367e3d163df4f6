use crate::actor_framework::Entity;
use crate::domain::{Blog, BlogDraft};
use crate::transport::HttpMethod;

impl Entity for Blog {
    type Draft = BlogDraft;
    type Patch = BlogDraft;

    const RESOURCE: &'static str = "blog";
    const PATH: &'static str = "/api/blogs";
    const UPDATE_METHOD: HttpMethod = HttpMethod::Patch;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
