//! Administrator report triage.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/reports` | Filtered listing (`search`, `status`, `reporter`) |
//! | GET | `/api/admin/reports/stats` | Counts per status |
//! | GET | `/api/admin/reports/reporters` | Distinct reporters |
//! | PATCH | `/api/admin/reports/{id}/status` | Change status |
//! | PUT | `/api/admin/reports/{id}/comment` | Attach a comment |
//! | PUT | `/api/admin/reports/{id}` | Full edit |
//! | DELETE | `/api/admin/reports/{id}` | Delete |

pub mod dtos;
pub mod handlers;
pub mod routes;
