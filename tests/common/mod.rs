//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bluegreen::load_balancer::{BackendStatus, ProbeError, StatusProbe};
use bluegreen::resilience::RetryPolicy;
use bluegreen::runtime::{ContainerRuntime, ContainerSpec, ProcessOutput, ProcessRunner, RuntimeError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A container runtime call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    IsRunning(String),
    Remove(String),
    Run(String),
    Stop(String),
}

impl Op {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Op::IsRunning(_))
    }
}

pub fn remove(name: &str) -> Op {
    Op::Remove(name.into())
}

pub fn run(name: &str) -> Op {
    Op::Run(name.into())
}

pub fn stop(name: &str) -> Op {
    Op::Stop(name.into())
}

/// In-memory runtime that records every call and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    log: Arc<Mutex<Vec<Op>>>,
    specs: Arc<Mutex<Vec<ContainerSpec>>>,
    running: Arc<Mutex<HashSet<String>>>,
    failing: Arc<Mutex<HashSet<Op>>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_running(names: &[&str]) -> Self {
        let runtime = Self::new();
        runtime
            .running
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| n.to_string()));
        runtime
    }

    /// Make this exact call exit non-zero.
    pub fn fail_on(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.log.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Op> {
        self.ops().into_iter().filter(Op::is_mutation).collect()
    }

    pub fn specs(&self) -> Vec<ContainerSpec> {
        self.specs.lock().unwrap().clone()
    }

    fn record(&self, op: Op) -> Result<(), RuntimeError> {
        self.log.lock().unwrap().push(op.clone());
        if self.failing.lock().unwrap().contains(&op) {
            return Err(RuntimeError::Failed {
                command: format!("{op:?}"),
                code: Some(1),
                stderr: "injected failure".into(),
            });
        }
        Ok(())
    }
}

impl ContainerRuntime for RecordingRuntime {
    async fn is_running(&self, name: &str) -> Result<bool, RuntimeError> {
        self.record(Op::IsRunning(name.into()))?;
        Ok(self.running.lock().unwrap().contains(name))
    }

    async fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(remove(name))?;
        self.running.lock().unwrap().remove(name);
        Ok(())
    }

    async fn run(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        self.record(run(&spec.name))?;
        self.specs.lock().unwrap().push(spec.clone());
        self.running.lock().unwrap().insert(spec.name.clone());
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(stop(name))?;
        self.running.lock().unwrap().remove(name);
        Ok(())
    }
}

/// Stand-in for the docker daemon behind the CLI.
///
/// Keeps container state and answers like docker does: plain `rm` refuses a
/// running container, `run` refuses a name that is taken.
#[derive(Default)]
pub struct FakeDaemon {
    /// Container name to running flag.
    containers: Mutex<HashMap<String, bool>>,
    calls: Mutex<Vec<String>>,
    stall_next_run: Mutex<bool>,
}

impl FakeDaemon {
    pub fn with_running(names: &[&str]) -> Self {
        let daemon = Self::default();
        daemon
            .containers
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| (n.to_string(), true)));
        daemon
    }

    /// The next `run` creates its container and then times out.
    pub fn stall_next_run(&self) {
        *self.stall_next_run.lock().unwrap() = true;
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.containers.lock().unwrap().get(name).copied().unwrap_or(false)
    }

    /// Every invocation as `verb target`, e.g. `rm web2`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, args: &[String]) -> Result<ProcessOutput, RuntimeError> {
        let verb = args[0].as_str();
        let mut containers = self.containers.lock().unwrap();
        let missing = |name: &str| {
            ProcessOutput::failed(1, format!("Error response from daemon: No such container: {name}"))
        };

        match verb {
            "ps" => {
                let name = args[2].trim_start_matches("name=^").trim_end_matches('$');
                self.calls.lock().unwrap().push(format!("ps {name}"));
                let listed = if containers.get(name) == Some(&true) {
                    format!("{name}\n")
                } else {
                    String::new()
                };
                Ok(ProcessOutput::ok(listed))
            }
            "rm" => {
                let name = args[args.len() - 1].as_str();
                let force = args.iter().any(|a| a == "-f");
                self.calls.lock().unwrap().push(format!("rm {name}"));
                match containers.get(name).copied() {
                    None => Ok(missing(name)),
                    Some(true) if !force => Ok(ProcessOutput::failed(
                        1,
                        "Error response from daemon: You cannot remove a running container. \
                         Stop the container before attempting removal or force remove",
                    )),
                    Some(_) => {
                        containers.remove(name);
                        Ok(ProcessOutput::ok(format!("{name}\n")))
                    }
                }
            }
            "run" => {
                let name = args[3].as_str();
                self.calls.lock().unwrap().push(format!("run {name}"));
                if containers.contains_key(name) {
                    return Ok(ProcessOutput::failed(
                        125,
                        format!("docker: Error response from daemon: Conflict. The container name \"/{name}\" is already in use."),
                    ));
                }
                containers.insert(name.to_string(), true);
                let mut stall = self.stall_next_run.lock().unwrap();
                if *stall {
                    *stall = false;
                    return Err(RuntimeError::Timeout {
                        command: format!("docker run {name}"),
                        after: Duration::from_millis(10),
                    });
                }
                Ok(ProcessOutput::ok("4f2a9c\n"))
            }
            "stop" => {
                let name = args[1].as_str();
                self.calls.lock().unwrap().push(format!("stop {name}"));
                match containers.get_mut(name) {
                    None => Ok(missing(name)),
                    Some(running) => {
                        *running = false;
                        Ok(ProcessOutput::ok(format!("{name}\n")))
                    }
                }
            }
            other => panic!("unexpected docker command {other}"),
        }
    }
}

impl ProcessRunner for &FakeDaemon {
    async fn run(
        &self,
        _program: &str,
        args: &[String],
        _timeout: Duration,
    ) -> Result<ProcessOutput, RuntimeError> {
        self.answer(args)
    }
}

/// What the scripted probe answers for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Running,
    Stopped,
    Unreachable,
    Garbled,
}

/// Status probe answering from a per-backend script.
///
/// Answers are consumed in order; the last one repeats forever.
#[derive(Default)]
pub struct ScriptedProbe {
    script: Mutex<HashMap<String, VecDeque<Answer>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(initial: &[(&str, Answer)]) -> Self {
        let probe = Self::default();
        for (name, answer) in initial {
            probe.then(name, &[*answer]);
        }
        probe
    }

    /// Append answers for `name`.
    pub fn then(&self, name: &str, answers: &[Answer]) {
        self.script
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .extend(answers.iter().copied());
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl StatusProbe for &ScriptedProbe {
    async fn status(&self, backend: &str) -> Result<BackendStatus, ProbeError> {
        self.queries.lock().unwrap().push(backend.to_string());

        let answer = {
            let mut script = self.script.lock().unwrap();
            let queue = script
                .get_mut(backend)
                .unwrap_or_else(|| panic!("no script for {backend}"));
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                *queue.front().unwrap()
            }
        };

        match answer {
            Answer::Running => Ok(BackendStatus::Running {
                address: "172.18.0.10".into(),
            }),
            Answer::Stopped => Ok(BackendStatus::Stopped),
            Answer::Unreachable => Err(ProbeError::Connect(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Answer::Garbled => Err(ProbeError::Malformed("Unknown command.".into())),
        }
    }
}

/// Retries with near-zero delays so tests stay fast.
pub fn fast_retries(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay_ms: 1,
        max_delay_ms: 2,
    }
}

/// Mock HAProxy admin socket.
///
/// Replies to every connection with `reply` and records the command line.
pub async fn start_admin_socket(reply: &'static str) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let commands = Arc::new(Mutex::new(Vec::new()));
    let seen = commands.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let (read, mut write) = socket.into_split();
                let mut line = String::new();
                if BufReader::new(read).read_line(&mut line).await.is_ok() {
                    seen.lock().unwrap().push(line.trim_end().to_string());
                    let _ = write.write_all(reply.as_bytes()).await;
                    let _ = write.shutdown().await;
                }
            });
        }
    });

    (addr, commands)
}

/// Admin socket that accepts connections and never answers.
pub async fn start_silent_admin_socket() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
