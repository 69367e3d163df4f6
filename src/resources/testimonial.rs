use crate::actor_framework::{Deletable, Entity};
use crate::domain::{drop_blank, Testimonial, TestimonialDraft, TestimonialPatch, MAX_RATING};
use crate::error::StoreError;

impl Entity for Testimonial {
    type Draft = TestimonialDraft;
    type Patch = TestimonialPatch;

    const RESOURCE: &'static str = "testimonial";
    const PATH: &'static str = "/api/ratings";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn on_create(mut draft: TestimonialDraft) -> Result<TestimonialDraft, StoreError> {
        check_rating(draft.rating)?;
        draft.links = drop_blank(draft.links);
        draft.image_urls = drop_blank(draft.image_urls);
        Ok(draft)
    }

    fn on_update(mut patch: TestimonialPatch) -> Result<TestimonialPatch, StoreError> {
        if let Some(rating) = patch.rating {
            check_rating(rating)?;
        }
        patch.links = patch.links.map(drop_blank);
        patch.image_urls = patch.image_urls.map(drop_blank);
        Ok(patch)
    }
}

impl Deletable for Testimonial {}

fn check_rating(rating: u8) -> Result<(), StoreError> {
    if rating > MAX_RATING {
        return Err(StoreError::Validation(format!(
            "Rating must be between 0 and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}
