use crate::actor_framework::ResourceClient;
use crate::domain::Testimonial;

#[derive(Clone)]
pub struct TestimonialClient {
    inner: ResourceClient<Testimonial>,
}

impl_client_methods!(TestimonialClient, Testimonial, testimonial, testimonials);
impl_client_delete!(TestimonialClient, testimonial);

impl TestimonialClient {
    /// Mean rating across the cached testimonials, `None` when there are none.
    pub fn average_rating(&self) -> Option<f64> {
        let items = self.inner.items();
        if items.is_empty() {
            return None;
        }
        let total: u32 = items.iter().map(|t| u32::from(t.rating)).sum();
        Some(f64::from(total) / items.len() as f64)
    }
}
