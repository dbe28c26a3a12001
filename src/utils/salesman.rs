//! Salesman and tracking-link statistics.

use serde_json::Value;

use crate::models::{
    PersonRef, RawTrackingLink, RawUserRole, RoleNames, SalesmanEntry, SalesmanRecord,
    SalesmanStatistics, SalesmanSummary, TopSalesman, TrackingLinkRecord, TrackingLinksResponse,
    UserRolesResponse,
};

/// Ticket price used to derive paid registrations from tracking-link revenue
pub const TICKET_PRICE: f64 = 70.0;

fn count(value: Option<f64>) -> u64 {
    value.unwrap_or(0.0).max(0.0) as u64
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Build a salesman entry from a user role
pub fn salesman_from_user_role(user: RawUserRole) -> SalesmanEntry {
    let free = count(user.frees);
    let paid = count(user.paid);

    SalesmanEntry::Salesman(SalesmanRecord {
        id: user.id,
        user_id: user.user_id,
        phone_number: user.user_phone_number,
        first_name: non_empty(&user.user_first_name).or(user.first_name),
        last_name: non_empty(&user.user_last_name).or(user.last_name),
        email: user.email,
        role: RoleNames {
            english: user.role_english,
            hebrew: user.role_hebrew,
        },
        statistics: SalesmanStatistics {
            total_registrations: free + paid,
            free_registrations: free,
            paid_registrations: paid,
            revenue: user.statistics.and_then(|s| s.credit).unwrap_or(0.0),
            views: count(user.views_upper.filter(|v| *v != 0.0).or(user.views)),
        },
        link: user.link,
        joining_date: user.joining_date,
        added_by: user.added_by.map(|a| PersonRef {
            first_name: a.first_name,
            last_name: a.last_name,
            phone_number: a.phone_number,
        }),
        teamleader_ref: user.teamleader_ref.filter(|v| !v.is_null() && v.as_str() != Some("")),
        disabled: user.disabled.unwrap_or(false),
        permissions: user.permissions.unwrap_or_default(),
    })
}

/// Build a salesman-like entry from a tracking link.
///
/// Tracking links only report revenue, so paid registrations are derived as
/// `floor(revenue / TICKET_PRICE)`. Whatever `sold` counts beyond free and
/// paid is reported as hidden, clamped at zero.
pub fn salesman_from_tracking_link(link: RawTrackingLink) -> SalesmanEntry {
    let revenue = link.total_revenue.unwrap_or(0.0);
    let free = count(link.frees);
    let paid = count(Some((revenue / TICKET_PRICE).floor()));
    let sold = count(link.sold);

    SalesmanEntry::TrackingLink(TrackingLinkRecord {
        id: link.link.clone(),
        link_name: link.link_name,
        link: link.link,
        active_link: link.active_link,
        referer: link.referer.map(|r| PersonRef {
            first_name: r.ref_first_name,
            last_name: r.ref_last_name,
            phone_number: r.ref_phone_number.map(Value::from),
        }),
        statistics: SalesmanStatistics {
            total_registrations: free + paid,
            free_registrations: free,
            paid_registrations: paid,
            revenue,
            views: count(link.views_upper.filter(|v| *v != 0.0).or(link.views)),
        },
        sold,
        hidden_registrations: sold.saturating_sub(free).saturating_sub(paid),
    })
}

/// Merge user roles and tracking links into one list, salesmen first.
///
/// Either source only contributes when its response reports success.
pub fn collect_salesmen(
    user_roles: UserRolesResponse,
    tracking_links: TrackingLinksResponse,
) -> Vec<SalesmanEntry> {
    let mut salesmen = Vec::new();

    if user_roles.status.unwrap_or(false) {
        salesmen.extend(
            user_roles
                .users
                .unwrap_or_default()
                .into_iter()
                .map(salesman_from_user_role),
        );
    }

    if tracking_links.status.unwrap_or(false) {
        salesmen.extend(
            tracking_links
                .links
                .unwrap_or_default()
                .into_iter()
                .map(salesman_from_tracking_link),
        );
    }

    salesmen
}

/// Sum every channel's counters and pick the top performer.
///
/// Ties for the top spot go to the entry listed first.
pub fn summarize_salesmen(salesmen: &[SalesmanEntry]) -> SalesmanSummary {
    let top = salesmen.iter().reduce(|max, s| {
        if s.statistics().total_registrations > max.statistics().total_registrations {
            s
        } else {
            max
        }
    });

    let stats = || salesmen.iter().map(|s| s.statistics());

    SalesmanSummary {
        total_salesmen: salesmen.len(),
        total_views: stats().map(|s| s.views).sum(),
        total_registrations: stats().map(|s| s.total_registrations).sum(),
        total_free_registrations: stats().map(|s| s.free_registrations).sum(),
        total_paid_registrations: stats().map(|s| s.paid_registrations).sum(),
        total_revenue: stats().map(|s| s.revenue).sum(),
        top_salesman: top.map(|top| TopSalesman {
            id: top.id().map(str::to_string),
            name: top.display_name(),
            phone_number: top.phone_number(),
            kind: top.kind().to_string(),
            total_registrations: top.statistics().total_registrations,
        }),
    }
}

/// Order by total registrations, highest first; ties keep their order
pub fn sort_by_registrations(salesmen: &mut [SalesmanEntry]) {
    salesmen.sort_by(|a, b| {
        b.statistics()
            .total_registrations
            .cmp(&a.statistics().total_registrations)
    });
}
