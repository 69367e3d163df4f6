use crate::actor_framework::ResourceClient;
use crate::domain::Blog;

/// Client for the blog store. Blogs cannot be deleted through the API.
#[derive(Clone)]
pub struct BlogClient {
    inner: ResourceClient<Blog>,
}

impl_client_methods!(BlogClient, Blog, blog, blogs);
