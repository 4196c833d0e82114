//! Task cycling and the single worker execution context.
//!
//! The controller side ([`TaskScheduler`]) only ever enqueues commands;
//! the [`Worker`] owns the tasks and the platform and executes commands
//! strictly in submission order. Because every `run` and `release` goes
//! through the same queue, no two peripheral operations overlap and an
//! outgoing task is always released before the next selected task runs.
//!
//! ```text
//!  Trigger ──► TaskScheduler ──try_send──► Channel<Command> ──► Worker ──► Task::run / release
//!                                                                 │
//!                                                                 └──► Signal<Celsius>
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::bmp280::Celsius;
use crate::config::MAX_TASKS;
use crate::error::Error;
use crate::input::Trigger;
use crate::peripheral::PeripheralManager;
use crate::task::{Task, TaskList};

/// Work item queued for the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Run the task at this index.
    Run(usize),
    /// Release the task at this index.
    Release(usize),
    /// Drain point: release everything and stop the worker.
    Stop,
}

/// What the worker does after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerState {
    Running,
    Stopped,
}

/// Build a task list, rejecting more than `MAX_TASKS` entries.
pub fn task_list<P, I>(tasks: I) -> Result<TaskList<P>, Error>
where
    P: PeripheralManager,
    I: IntoIterator<Item = Task<P>>,
{
    let mut list = TaskList::new();
    for task in tasks {
        list.push(task).map_err(|_| Error::TooManyTasks)?;
    }
    Ok(list)
}

/// Split a task list into a controller and the worker that serves it.
///
/// `channel` carries commands, `readings` receives every compensated
/// temperature. Fails with [`Error::NoTasks`] on an empty list.
#[allow(clippy::type_complexity)]
pub fn new<'a, M, P, D, const N: usize>(
    channel: &'a Channel<M, Command, N>,
    readings: &'a Signal<M, Celsius>,
    tasks: TaskList<P>,
    platform: P,
    delay: D,
) -> Result<(TaskScheduler<'a, M, N>, Worker<'a, M, P, D, N>), Error>
where
    M: RawMutex,
    P: PeripheralManager,
    D: DelayNs,
{
    if tasks.is_empty() {
        return Err(Error::NoTasks);
    }

    let names: Vec<&'static str, MAX_TASKS> = tasks.iter().map(Task::name).collect();
    info!("{} tasks available. Current task is {}", names.len(), names[0]);

    let scheduler = TaskScheduler {
        commands: channel.sender(),
        names,
        current: 0,
        shut_down: false,
    };
    let worker = Worker {
        commands: channel.receiver(),
        readings,
        tasks,
        platform,
        delay,
    };
    Ok((scheduler, worker))
}

/// Controller side: tracks the selection and enqueues commands.
pub struct TaskScheduler<'a, M: RawMutex, const N: usize> {
    commands: Sender<'a, M, Command, N>,
    names: Vec<&'static str, MAX_TASKS>,
    current: usize,
    shut_down: bool,
}

impl<'a, M: RawMutex, const N: usize> TaskScheduler<'a, M, N> {
    /// Number of tasks being cycled; never zero.
    pub fn task_count(&self) -> usize {
        self.names.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &'static str {
        self.names[self.current]
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Release the selected task, then select the next one (wrapping).
    ///
    /// The release is enqueued before the index moves, so a later
    /// `execute_current` can never overtake it. On a full queue nothing
    /// changes.
    pub fn select_next(&mut self) -> Result<usize, Error> {
        self.ensure_running()?;
        self.dispatch(Command::Release(self.current))?;
        self.current = (self.current + 1) % self.names.len();
        info!(
            "Changed current task to {} ({})",
            self.current,
            self.current_name()
        );
        Ok(self.current)
    }

    /// Enqueue a run of the selected task.
    pub fn execute_current(&mut self) -> Result<(), Error> {
        self.ensure_running()?;
        debug!(
            "Executing task {} ({})",
            self.current,
            self.current_name()
        );
        self.dispatch(Command::Run(self.current))
    }

    /// Release the selected task and stop the worker.
    ///
    /// Waits for queue space rather than failing, so commands already
    /// queued drain first and the final release is never lost.
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        self.ensure_running()?;
        self.shut_down = true;
        info!("Shutting down, releasing {}", self.current_name());
        self.commands.send(Command::Release(self.current)).await;
        self.commands.send(Command::Stop).await;
        Ok(())
    }

    pub async fn handle(&mut self, trigger: Trigger) -> Result<(), Error> {
        match trigger {
            Trigger::Advance => self.select_next().map(|_| ()),
            Trigger::Execute => self.execute_current(),
            Trigger::Shutdown => self.shutdown().await,
        }
    }

    fn ensure_running(&self) -> Result<(), Error> {
        if self.shut_down {
            warn!("Scheduler is shut down");
            return Err(Error::ShutDown);
        }
        Ok(())
    }

    fn dispatch(&self, command: Command) -> Result<(), Error> {
        self.commands.try_send(command).map_err(|_| {
            warn!("Command queue full, dropped {:?}", command);
            Error::QueueFull
        })
    }
}

/// The single execution context: owns tasks, platform and delay.
pub struct Worker<'a, M: RawMutex, P: PeripheralManager, D, const N: usize> {
    commands: Receiver<'a, M, Command, N>,
    readings: &'a Signal<M, Celsius>,
    tasks: TaskList<P>,
    platform: P,
    delay: D,
}

impl<'a, M, P, D, const N: usize> Worker<'a, M, P, D, N>
where
    M: RawMutex,
    P: PeripheralManager,
    D: DelayNs,
{
    pub fn tasks(&self) -> &[Task<P>] {
        &self.tasks
    }

    /// Wait for and execute exactly one command.
    pub async fn step(&mut self) -> WorkerState {
        let command = self.commands.receive().await;
        trace!("Worker received {:?}", command);

        match command {
            Command::Run(index) => {
                if let Some(task) = self.tasks.get_mut(index) {
                    if let Some(reading) = task.run(&mut self.platform, &mut self.delay).await {
                        self.readings.signal(reading);
                    }
                }
                WorkerState::Running
            }
            Command::Release(index) => {
                if let Some(task) = self.tasks.get_mut(index) {
                    debug!("Releasing task {} ({})", index, task.name());
                    task.release();
                }
                WorkerState::Running
            }
            Command::Stop => {
                for task in self.tasks.iter_mut() {
                    task.release();
                }
                info!("Worker stopped");
                WorkerState::Stopped
            }
        }
    }

    /// Execute commands until `Stop`, then hand the platform back.
    pub async fn run(mut self) -> P {
        while self.step().await == WorkerState::Running {}
        self.platform
    }
}
