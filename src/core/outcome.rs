//! Classification of git command results.
//!
//! Git offers no structured result for most porcelain commands, so decisions
//! are taken on exit codes and on the human-readable text git prints. All of
//! those substring checks live in [`classify_outcome`]; a git release that
//! rewords one of these messages only needs a change here.

use crate::core::runner::CommandOutcome;

pub const CONFLICT_MARKER: &str = "CONFLICT";
pub const REJECTED_MARKER: &str = "rejected";
pub const EVERYTHING_UP_TO_DATE_MARKER: &str = "Everything up-to-date";
pub const ALREADY_UP_TO_DATE_MARKER: &str = "Already up to date";
pub const NOTHING_TO_COMMIT_MARKER: &str = "nothing to commit";
pub const NO_UPSTREAM_MARKER: &str = "has no upstream branch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    /// Merge, rebase or stash application stopped on conflicting changes
    Conflict,
    /// The remote refused the push
    Rejected,
    /// A push with nothing to send
    EverythingUpToDate,
    /// A pull or merge with nothing to bring in
    AlreadyUpToDate,
    NothingToCommit,
    NoUpstream,
    Failed,
}

impl OutcomeKind {
    /// Outcomes that leave the repository as the caller wanted it
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            OutcomeKind::Success
                | OutcomeKind::EverythingUpToDate
                | OutcomeKind::AlreadyUpToDate
                | OutcomeKind::NothingToCommit
        )
    }
}

pub fn classify_outcome(outcome: &CommandOutcome) -> OutcomeKind {
    if outcome.success() {
        return OutcomeKind::Success;
    }

    let combined = outcome.combined();

    if combined.contains(CONFLICT_MARKER) {
        OutcomeKind::Conflict
    } else if outcome.stderr.contains(REJECTED_MARKER) {
        OutcomeKind::Rejected
    } else if combined.contains(EVERYTHING_UP_TO_DATE_MARKER) {
        OutcomeKind::EverythingUpToDate
    } else if combined.contains(ALREADY_UP_TO_DATE_MARKER) {
        OutcomeKind::AlreadyUpToDate
    } else if combined.contains(NOTHING_TO_COMMIT_MARKER) {
        OutcomeKind::NothingToCommit
    } else if combined.contains(NO_UPSTREAM_MARKER) {
        OutcomeKind::NoUpstream
    } else {
        OutcomeKind::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Output recorded from git 2.4x
    const REBASE_CONFLICT_STDOUT: &str = "Auto-merging src/app.rs\nCONFLICT (content): Merge conflict in src/app.rs";
    const REBASE_CONFLICT_STDERR: &str = "error: could not apply 1a2b3c4... Add login\nhint: Resolve all conflicts manually, mark them as resolved with\nhint: \"git add/rm <conflicted_files>\", then run \"git rebase --continue\".";
    const PUSH_REJECTED_STDERR: &str = "To github.com:team/portal.git\n ! [rejected]        feature/login -> feature/login (fetch first)\nerror: failed to push some refs to 'github.com:team/portal.git'";
    const PUSH_NO_UPSTREAM_STDERR: &str = "fatal: The current branch feature/login has no upstream branch.\nTo push the current branch and set the remote as upstream, use\n\n    git push --set-upstream origin feature/login";
    const COMMIT_NOTHING_STDOUT: &str = "On branch feature/version-1-2-0\nnothing to commit, working tree clean";

    #[test]
    fn test_success_wins_over_text() {
        let outcome = CommandOutcome::new(0, "Everything up-to-date", "");
        assert_eq!(classify_outcome(&outcome), OutcomeKind::Success);
    }

    #[test]
    fn test_rebase_conflict() {
        let outcome = CommandOutcome::new(1, REBASE_CONFLICT_STDOUT, REBASE_CONFLICT_STDERR);
        assert_eq!(classify_outcome(&outcome), OutcomeKind::Conflict);
    }

    #[test]
    fn test_conflict_reported_on_stderr_only() {
        let outcome = CommandOutcome::new(1, "", "CONFLICT (modify/delete): a.txt deleted in HEAD");
        assert_eq!(classify_outcome(&outcome), OutcomeKind::Conflict);
    }

    #[test]
    fn test_push_rejected() {
        let outcome = CommandOutcome::new(1, "", PUSH_REJECTED_STDERR);
        assert_eq!(classify_outcome(&outcome), OutcomeKind::Rejected);
    }

    #[test]
    fn test_rejected_only_counts_on_stderr() {
        let outcome = CommandOutcome::new(1, "rejected", "fatal: something else");
        assert_eq!(classify_outcome(&outcome), OutcomeKind::Failed);
    }

    #[test]
    fn test_no_upstream() {
        let outcome = CommandOutcome::new(128, "", PUSH_NO_UPSTREAM_STDERR);
        assert_eq!(classify_outcome(&outcome), OutcomeKind::NoUpstream);
    }

    #[test]
    fn test_nothing_to_commit() {
        let outcome = CommandOutcome::new(1, COMMIT_NOTHING_STDOUT, "");
        let kind = classify_outcome(&outcome);
        assert_eq!(kind, OutcomeKind::NothingToCommit);
        assert!(kind.is_benign());
    }

    #[test]
    fn test_up_to_date_variants() {
        let push = CommandOutcome::new(1, "Everything up-to-date", "");
        assert_eq!(classify_outcome(&push), OutcomeKind::EverythingUpToDate);

        let merge = CommandOutcome::new(1, "Already up to date.", "");
        assert_eq!(classify_outcome(&merge), OutcomeKind::AlreadyUpToDate);
    }

    #[test]
    fn test_generic_failure() {
        let outcome = CommandOutcome::new(128, "", "fatal: not a git repository");
        let kind = classify_outcome(&outcome);
        assert_eq!(kind, OutcomeKind::Failed);
        assert!(!kind.is_benign());
    }
}
