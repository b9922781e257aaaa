//! Subida de nivel de socios: lee todos los socios por páginas, descarta los
//! que no pueden subir y el writer promueve y persiste el resto.

use std::sync::Arc;

use batch_core::{BatchError, ChunkStep, ItemProcessor, ItemResult, ItemWriter, Job, JobExecution, JobExecutionListener,
                 RepeatStatus, RunIdIncrementer, StepContribution, StepContext, Tasklet, TaskletStep};
use batch_domain::{Level, Member, MemberRepository};
use chrono::NaiveDate;
use log::{debug, info};

use crate::readers::MemberPagingReader;
use crate::store::InMemoryMemberRepository;
use crate::item_error;

pub const MEMBER_LEVEL_UP_JOB: &str = "memberLevelUpJob";
pub const MEMBER_LEVEL_UP_STEP: &str = "memberLevelUpStep";
pub const SAVE_MEMBER_JOB: &str = "saveMemberJob";
pub const SAVE_MEMBER_STEP: &str = "saveMemberStep";

/// Deja pasar sólo los socios que pueden subir de nivel.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelUpProcessor;

impl ItemProcessor<Member, Member> for LevelUpProcessor {
    fn process(&mut self, member: Member) -> ItemResult<Option<Member>> {
        if member.eligible_for_promotion() {
            Ok(Some(member))
        } else {
            Ok(None)
        }
    }
}

/// Promueve cada socio del chunk y lo guarda.
///
/// Con `promotion_date` fija la fecha de actualización; si no, usa la fecha
/// local del día.
pub struct LevelUpWriter {
    repository: Arc<dyn MemberRepository>,
    promotion_date: Option<NaiveDate>,
}

impl LevelUpWriter {
    pub fn new(repository: Arc<dyn MemberRepository>) -> Self {
        Self { repository,
               promotion_date: None }
    }

    pub fn at(repository: Arc<dyn MemberRepository>, promotion_date: NaiveDate) -> Self {
        Self { repository,
               promotion_date: Some(promotion_date) }
    }
}

impl ItemWriter<Member> for LevelUpWriter {
    fn write(&mut self, items: &[Member]) -> ItemResult<()> {
        for member in items {
            let mut member = member.clone();
            let before = member.level();
            let after = match self.promotion_date {
                Some(date) => member.promote_at(date),
                None => member.promote(),
            };
            debug!("{} promoted {before} -> {after}", member.name());
            self.repository.save(member).map_err(item_error)?;
        }
        Ok(())
    }
}

/// Informa del total de socios actualizados al terminar el job.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemberLevelJobListener;

impl JobExecutionListener for MemberLevelJobListener {
    fn after_job(&self, execution: &JobExecution) -> Result<(), BatchError> {
        info!("{} finished with status {}: member level up count {}",
              execution.job_name(),
              execution.status(),
              execution.write_count());
        Ok(())
    }
}

/// Guarda una lista fija de socios en una única invocación.
pub struct SaveMemberTasklet {
    repository: Arc<dyn MemberRepository>,
    members: Vec<Member>,
}

impl SaveMemberTasklet {
    pub fn new(repository: Arc<dyn MemberRepository>, members: Vec<Member>) -> Self {
        Self { repository, members }
    }
}

impl Tasklet for SaveMemberTasklet {
    fn execute(&mut self, contribution: &mut StepContribution, _ctx: &mut StepContext<'_>) -> ItemResult<RepeatStatus> {
        let saved = self.repository.save_all(self.members.clone()).map_err(item_error)?;
        contribution.increment_write_count(saved.len() as u64);
        info!("saved {} members", saved.len());
        Ok(RepeatStatus::Finished)
    }
}

/// Socios de muestra: uno por cada caso de la regla de promoción.
pub fn sample_members() -> Vec<Member> {
    vec![Member::new("kim", 3_000),
         Member::new("lee", 250_000),
         Member::with_level("park", 330_000, Level::Silver),
         Member::new("choi", 450_000),
         Member::with_level("jung", 250_000, Level::Silver),
         Member::new("kang", 520_000),
         Member::with_level("yoon", 900_000, Level::Vip)]
}

/// Step chunk de subida de nivel. Acepta el parámetro opcional
/// `promotionDate` (fecha `YYYY-MM-DD`).
pub fn level_up_step(repository: Arc<InMemoryMemberRepository>,
                     chunk_size: usize)
                     -> Result<ChunkStep<Member, Member>, BatchError> {
    let reader_repository = repository.clone();
    let writer_repository = repository.clone();
    ChunkStep::<Member, Member>::builder(MEMBER_LEVEL_UP_STEP, chunk_size)
        .reader(move |_| Ok(MemberPagingReader::new("memberPagingReader", reader_repository.clone(), chunk_size)))
        .processor(|_| Ok(LevelUpProcessor))
        .writer(move |binder| {
            let repository: Arc<dyn MemberRepository> = writer_repository.clone();
            Ok(match binder.optional::<NaiveDate>("promotionDate")? {
                Some(date) => LevelUpWriter::at(repository, date),
                None => LevelUpWriter::new(repository),
            })
        })
        .transaction_manager(repository)
        .build()
}

pub fn member_level_up_job(repository: Arc<InMemoryMemberRepository>, chunk_size: usize) -> Result<Job, BatchError> {
    Job::builder(MEMBER_LEVEL_UP_JOB).incrementer(RunIdIncrementer::default())
                                     .listener(MemberLevelJobListener)
                                     .start(level_up_step(repository, chunk_size)?)
                                     .build()
}

pub fn save_member_job(repository: Arc<InMemoryMemberRepository>, members: Vec<Member>) -> Result<Job, BatchError> {
    let tx = repository.clone();
    let step = TaskletStep::builder(SAVE_MEMBER_STEP).tasklet(move |_| {
                                                         Ok(SaveMemberTasklet::new(repository.clone(), members.clone()))
                                                     })
                                                     .transaction_manager(tx)
                                                     .build()?;
    Job::builder(SAVE_MEMBER_JOB).incrementer(RunIdIncrementer::default()).start(step).build()
}
