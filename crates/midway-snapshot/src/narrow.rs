//! Re-filtering a snapshot under a stricter context.

use midway_core::{ConfigError, Field, Record, ViewContext, VisibilityMask};

use crate::model::{DomainSnapshot, GuestStats, Rides, Shops, Staff};

fn restrict<T>(mask: &VisibilityMask, name: &str, field: Field<T>) -> Field<T> {
    if mask.keeps(name) {
        field
    } else {
        Field::Absent
    }
}

impl DomainSnapshot {
    /// A new snapshot showing only what `ctx` may see.
    ///
    /// Equivalent to rebuilding from the raw snapshot under `ctx`.
    /// Fails if `ctx` would reveal anything the current context hid,
    /// since that data is gone.
    pub fn narrow(&self, ctx: ViewContext) -> Result<DomainSnapshot, ConfigError> {
        if !self.context.covers(&ctx) {
            return Err(ConfigError::ContextWidening {
                from: self.context,
                to: ctx,
            });
        }

        let mut out = self.clone();
        out.context = ctx;

        let root = VisibilityMask::compile(Self::SCHEMA, ctx);
        out.research_operating_cost =
            restrict(&root, "research_operating_cost", out.research_operating_cost);
        out.fast_days_since_last_new_entity = restrict(
            &root,
            "fast_days_since_last_new_entity",
            out.fast_days_since_last_new_entity,
        );
        out.medium_days_since_last_new_entity = restrict(
            &root,
            "medium_days_since_last_new_entity",
            out.medium_days_since_last_new_entity,
        );
        out.slow_days_since_last_new_entity = restrict(
            &root,
            "slow_days_since_last_new_entity",
            out.slow_days_since_last_new_entity,
        );
        out.paths = restrict(&root, "paths", out.paths);
        out.waters = restrict(&root, "waters", out.waters);

        let guests = VisibilityMask::compile(GuestStats::SCHEMA, ctx);
        out.guests.avg_happiness = restrict(&guests, "avg_happiness", out.guests.avg_happiness);
        out.guests.avg_hunger = restrict(&guests, "avg_hunger", out.guests.avg_hunger);
        out.guests.avg_thirst = restrict(&guests, "avg_thirst", out.guests.avg_thirst);

        let rides = VisibilityMask::compile(Rides::SCHEMA, ctx);
        out.rides.ride_list = restrict(&rides, "ride_list", out.rides.ride_list);
        let shops = VisibilityMask::compile(Shops::SCHEMA, ctx);
        out.shops.shop_list = restrict(&shops, "shop_list", out.shops.shop_list);
        let staff = VisibilityMask::compile(Staff::SCHEMA, ctx);
        out.staff.staff_list = restrict(&staff, "staff_list", out.staff.staff_list);

        log::debug!("narrowed snapshot step={} {} -> {}", self.step, self.context, ctx);
        Ok(out)
    }
}
