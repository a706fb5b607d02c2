//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobSummary;

/// Default page size of the job history listing
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Query string of `GET /api/jobs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListJobsQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListJobsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of the job history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub items: Vec<JobSummary>,
}

impl JobPage {
    /// Number of pages in the listing, never less than one
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.per_page)).max(1)
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
