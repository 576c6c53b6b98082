use std::collections::HashSet;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::data_access::repository::Repository;
use crate::project::Project;
use crate::project_due_today_response::ProjectDueTodayResponse;
use crate::task::Task;
use crate::task_status::TaskStatus;
use crate::{EngineError, EngineResult};

const PROJECT_SORT_PARAMETERS: &str = "'startDate' or 'dueDate'";
const TASK_SORT_PARAMETERS: &str = "'startDate', 'dueDate' or 'dateCompleted'";

/// Read-side queries over the two collections. The store has no native
/// joins or text search; everything here is a scan over the collection,
/// which is what the query patterns need at this scale.
pub struct QueryEngine<R> {
    repo: R,
}

impl<R: Repository> QueryEngine<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Tasks whose cached project name equals `name` exactly (after
    /// trimming). An empty result is reported as not-found so a mistyped
    /// project name is visible to the caller instead of an empty list.
    pub fn filter_tasks_by_project_name(&self, name: &str) -> EngineResult<Vec<Task>> {
        let wanted = name.trim();
        let tasks: Vec<Task> = self
            .repo
            .list_tasks()?
            .into_iter()
            .filter(|task| {
                task.project
                    .as_ref()
                    .is_some_and(|p| p.project_name == wanted)
            })
            .collect();

        if tasks.is_empty() {
            return Err(EngineError::not_found("tasks for project", wanted));
        }
        Ok(tasks)
    }

    pub fn filter_tasks_by_status(&self, status: &str) -> EngineResult<Vec<Task>> {
        let status: TaskStatus = status
            .parse()
            .map_err(|_| EngineError::Validation(format!("'{status}' is not a valid task status")))?;

        Ok(self
            .repo
            .list_tasks()?
            .into_iter()
            .filter(|task| task.status == status)
            .collect())
    }

    /// Case-insensitive substring search on task names.
    pub fn search_tasks_by_name(&self, keyword: &str) -> EngineResult<Vec<Task>> {
        let needle = keyword.trim().to_lowercase();
        Ok(self
            .repo
            .list_tasks()?
            .into_iter()
            .filter(|task| task.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Sort order is fixed per parameter: soonest-starting first, but
    /// most-recently-due first.
    pub fn sort_projects(&self, parameter: &str) -> EngineResult<Vec<Project>> {
        let mut projects = self.repo.list_projects()?;
        match parameter.trim() {
            "startDate" => projects.sort_by(|a, b| a.start_date.cmp(&b.start_date)),
            "dueDate" => projects.sort_by(|a, b| b.due_date.cmp(&a.due_date)),
            other => {
                return Err(EngineError::InvalidParameter {
                    parameter: other.to_string(),
                    allowed: PROJECT_SORT_PARAMETERS,
                })
            }
        }
        Ok(projects)
    }

    /// Same asymmetry as project sorting, plus most-recently-completed
    /// first; tasks without a completion date sort last.
    pub fn sort_tasks(&self, parameter: &str) -> EngineResult<Vec<Task>> {
        let mut tasks = self.repo.list_tasks()?;
        match parameter.trim() {
            "startDate" => tasks.sort_by(|a, b| a.start_date.cmp(&b.start_date)),
            "dueDate" => tasks.sort_by(|a, b| b.due_date.cmp(&a.due_date)),
            "dateCompleted" => tasks.sort_by(|a, b| b.date_completed.cmp(&a.date_completed)),
            other => {
                return Err(EngineError::InvalidParameter {
                    parameter: other.to_string(),
                    allowed: TASK_SORT_PARAMETERS,
                })
            }
        }
        Ok(tasks)
    }

    /// Projects with at least one assigned task due within today's local
    /// calendar day. The logical join runs task back-references against the
    /// window; each qualifying project appears exactly once.
    pub fn projects_due_today(&self) -> EngineResult<Vec<ProjectDueTodayResponse>> {
        let (start, end) = day_window(Local::now());
        self.projects_due_within(start, end)
    }

    pub(crate) fn projects_due_within(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<ProjectDueTodayResponse>> {
        let tasks = self.repo.list_tasks()?;
        let rows = self
            .repo
            .list_projects()?
            .into_iter()
            .filter(|project| {
                tasks.iter().any(|task| {
                    task.is_assigned_to_project(project.id)
                        && task.due_date >= start
                        && task.due_date <= end
                })
            })
            .map(|project| ProjectDueTodayResponse {
                id: project.id,
                name: project.name,
                description: project.description,
                start_date: project.start_date,
                due_date: project.due_date,
            })
            .collect();
        Ok(rows)
    }

    /// Tasks whose owning project is due within today's local calendar day.
    /// This filters by the project's due date, not the task's own — the
    /// behavior this endpoint has always had.
    pub fn tasks_due_today(&self) -> EngineResult<Vec<Task>> {
        let (start, end) = day_window(Local::now());
        self.tasks_due_within(start, end)
    }

    pub(crate) fn tasks_due_within(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<Task>> {
        let due_projects: HashSet<Uuid> = self
            .repo
            .list_projects()?
            .into_iter()
            .filter(|project| project.due_date >= start && project.due_date <= end)
            .map(|project| project.id)
            .collect();

        Ok(self
            .repo
            .list_tasks()?
            .into_iter()
            .filter(|task| {
                task.project
                    .as_ref()
                    .is_some_and(|p| due_projects.contains(&p.project_id))
            })
            .collect())
    }
}

/// Inclusive bounds of the local calendar day containing `now`, in UTC.
/// Both bounds come from local midnights, so the window stays aligned with
/// the calendar day even when a DST transition makes it 23 or 25 hours.
pub(crate) fn day_window(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let start = match Local.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest() {
        Some(t) => t.with_timezone(&Utc),
        // Midnight falls in a DST gap; the day effectively starts now.
        None => now.with_timezone(&Utc),
    };
    let end = date
        .succ_opt()
        .and_then(|next| Local.from_local_datetime(&next.and_time(NaiveTime::MIN)).earliest())
        .map(|t| t.with_timezone(&Utc) - Duration::milliseconds(1))
        .unwrap_or_else(|| start + Duration::days(1) - Duration::milliseconds(1));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_project_request::CreateProjectRequest;
    use crate::create_task_request::CreateTaskRequest;
    use crate::data_access::memory_context::MemoryContext;
    use crate::engine::association::AssociationEngine;
    use crate::task_priority::TaskPriority;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        (start, start + Duration::days(1) - Duration::milliseconds(1))
    }

    fn seed_project(repo: &MemoryContext, name: &str, due: DateTime<Utc>) -> Project {
        let mut project = Project::new(CreateProjectRequest {
            name: Some(name.to_string()),
            description: None,
            start_date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            due_date: Some(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()),
        })
        .unwrap();
        project.due_date = due;
        repo.insert_project(&project).unwrap();
        project
    }

    fn seed_task(repo: &MemoryContext, name: &str, due: DateTime<Utc>) -> Task {
        let mut task = Task::new(CreateTaskRequest {
            name: Some(name.to_string()),
            description: None,
            priority: Some(TaskPriority::Medium),
            assigned_to: Some("ada".to_string()),
            start_date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            due_date: Some(Utc.with_ymd_and_hms(2024, 6, 28, 0, 0, 0).unwrap()),
        })
        .unwrap();
        task.due_date = due;
        repo.insert_task(&task).unwrap();
        task
    }

    fn assign(repo: &MemoryContext, task: &Task, project: &Project) {
        AssociationEngine::new(repo.clone())
            .assign_task(&task.id.to_string(), &project.id.to_string())
            .unwrap();
    }

    #[test]
    fn filter_by_project_name_matches_exactly_after_trimming() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let far_due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let project = seed_project(&repo, "Alpha", far_due);
        let task = seed_task(&repo, "Write Report", far_due);
        assign(&repo, &task, &project);

        let found = engine.filter_tasks_by_project_name("  Alpha ").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, task.id);
    }

    #[test]
    fn filter_by_project_name_reports_not_found_on_empty_result() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let far_due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        seed_project(&repo, "Alpha", far_due);

        let err = engine.filter_tasks_by_project_name("Alpah").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn filter_by_status_matches_exactly() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let mut done = seed_task(&repo, "Done task", due);
        done.change_status(TaskStatus::Done, Utc::now());
        repo.update_task(&done).unwrap();
        seed_task(&repo, "Open task", due);

        let found = engine.filter_tasks_by_status("done").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, done.id);

        assert!(engine.filter_tasks_by_status("not-a-status").is_err());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let task = seed_task(&repo, "Write Report", due);
        seed_task(&repo, "Plan sprint", due);

        for keyword in ["report", "WRITE", " rite "] {
            let found = engine.search_tasks_by_name(keyword).unwrap();
            assert_eq!(found.len(), 1, "keyword {keyword:?}");
            assert_eq!(found[0].id, task.id);
        }
    }

    #[test]
    fn sort_parameters_outside_the_enum_are_rejected() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo);

        for parameter in ["createdAt", "name", "", "DATECOMPLETED"] {
            assert!(matches!(
                engine.sort_tasks(parameter),
                Err(EngineError::InvalidParameter { .. })
            ));
        }
        assert!(matches!(
            engine.sort_projects("dateCompleted"),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn sort_directions_follow_the_parameter() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let early = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 25, 0, 0, 0).unwrap();

        let mut a = seed_task(&repo, "A", early);
        a.start_date = late;
        repo.update_task(&a).unwrap();
        let mut b = seed_task(&repo, "B", late);
        b.start_date = early;
        repo.update_task(&b).unwrap();

        // startDate ascending
        let sorted = engine.sort_tasks("startDate").unwrap();
        assert_eq!(sorted[0].id, b.id);

        // dueDate descending
        let sorted = engine.sort_tasks("dueDate").unwrap();
        assert_eq!(sorted[0].id, b.id);

        // dateCompleted descending, never-completed tasks last
        let mut completed = seed_task(&repo, "C", late);
        completed.change_status(TaskStatus::Done, Utc::now());
        repo.update_task(&completed).unwrap();
        let sorted = engine.sort_tasks("dateCompleted").unwrap();
        assert_eq!(sorted[0].id, completed.id);
        assert!(sorted[1].date_completed.is_none());
    }

    #[test]
    fn projects_due_today_deduplicates_and_respects_the_window() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let (start, end) = window();
        let in_window = start + Duration::hours(9);
        let tomorrow = end + Duration::hours(10);

        let project = seed_project(&repo, "Alpha", tomorrow);
        let quiet = seed_project(&repo, "Beta", tomorrow);
        let t1 = seed_task(&repo, "T1", in_window);
        let t2 = seed_task(&repo, "T2", tomorrow);
        assign(&repo, &t1, &project);
        assign(&repo, &t2, &project);
        let t3 = seed_task(&repo, "T3", tomorrow);
        assign(&repo, &t3, &quiet);

        let rows = engine.projects_due_within(start, end).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, project.id);
        assert_eq!(rows[0].name, "Alpha");
    }

    #[test]
    fn projects_due_today_ignores_unassigned_tasks() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let (start, end) = window();

        seed_project(&repo, "Alpha", end + Duration::days(5));
        seed_task(&repo, "Loose task", start + Duration::hours(1));

        assert!(engine.projects_due_within(start, end).unwrap().is_empty());
    }

    #[test]
    fn tasks_due_today_filter_by_the_projects_due_date() {
        let repo = MemoryContext::new();
        let engine = QueryEngine::new(repo.clone());
        let (start, end) = window();
        let in_window = start + Duration::hours(9);
        let tomorrow = end + Duration::hours(10);

        // Project due today: both of its tasks qualify regardless of their
        // own due dates.
        let due_project = seed_project(&repo, "Alpha", in_window);
        let t1 = seed_task(&repo, "T1", in_window);
        let t2 = seed_task(&repo, "T2", tomorrow);
        assign(&repo, &t1, &due_project);
        assign(&repo, &t2, &due_project);

        // Project due later: its task is excluded even though the task
        // itself is due today.
        let later_project = seed_project(&repo, "Beta", tomorrow);
        let t3 = seed_task(&repo, "T3", in_window);
        assign(&repo, &t3, &later_project);

        let tasks = engine.tasks_due_within(start, end).unwrap();
        let mut ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        ids.sort();
        let mut expected = vec![t1.id, t2.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn day_window_spans_local_midnight_to_a_millisecond_before_the_next() {
        let now = Local::now();
        let (start, end) = day_window(now);

        assert!(start <= now.with_timezone(&Utc));
        assert!(end >= now.with_timezone(&Utc));

        let next_midnight = (end + Duration::milliseconds(1)).with_timezone(&Local);
        assert_eq!(next_midnight.time(), NaiveTime::MIN);
        assert_eq!(
            next_midnight.date_naive(),
            now.date_naive().succ_opt().unwrap()
        );
    }
}
