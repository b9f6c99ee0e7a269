use std::collections::HashSet;

use winit::event::{ElementState, KeyboardInput, VirtualKeyCode};

use crate::ember::params::RenderParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 누르고 있는 동안 계속
    Move(Direction),
    FocusFarther,
    FocusNearer,
    WidenDefocus,
    NarrowDefocus,
    MoreBounces,
    FewerBounces,
    ToggleMouseGrab,
    Quit,
}

impl Action {
    pub fn from_key(key: VirtualKeyCode) -> Option<Self> {
        use VirtualKeyCode::*;

        Some(match key {
            W => Action::Move(Direction::Forward),
            S => Action::Move(Direction::Backward),
            A => Action::Move(Direction::Left),
            D => Action::Move(Direction::Right),
            Up => Action::FocusFarther,
            Down => Action::FocusNearer,
            Right => Action::WidenDefocus,
            Left => Action::NarrowDefocus,
            RBracket => Action::MoreBounces,
            LBracket => Action::FewerBounces,
            C => Action::ToggleMouseGrab,
            Escape => Action::Quit,
            _ => return None,
        })
    }

    /// 렌더 파라미터를 바꾸는 동작이면 적용하고 true
    pub fn apply(self, params: &mut RenderParameters) -> bool {
        match self {
            Action::FocusFarther => params.focus_farther(),
            Action::FocusNearer => params.focus_nearer(),
            Action::WidenDefocus => params.widen_defocus(),
            Action::NarrowDefocus => params.narrow_defocus(),
            Action::MoreBounces => params.more_bounces(),
            Action::FewerBounces => params.fewer_bounces(),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// 방금 눌림 (키 반복은 포함 안 함)
    Pressed(Action),
    Released(Action),
}

/// 눌린 키를 기억해서 운영체제 키 반복이 새 입력으로 들어오지 않게 함
#[derive(Debug, Default)]
pub struct KeyState {
    held: HashSet<VirtualKeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, input: &KeyboardInput) -> Option<KeyEvent> {
        let key = input.virtual_keycode?;
        self.handle(key, input.state)
    }

    pub fn handle(&mut self, key: VirtualKeyCode, state: ElementState) -> Option<KeyEvent> {
        let action = Action::from_key(key)?;
        match state {
            ElementState::Pressed if self.held.insert(key) => Some(KeyEvent::Pressed(action)),
            ElementState::Pressed => None,
            ElementState::Released => {
                self.held.remove(&key);
                Some(KeyEvent::Released(action))
            }
        }
    }

    /// 포커스를 잃으면 뗀 키 이벤트가 안 올 수 있으므로 전부 뗀 것으로 침
    pub fn clear(&mut self) {
        self.held.clear();
    }

    #[cfg(test)]
    fn is_held(&self, key: VirtualKeyCode) -> bool {
        self.held.contains(&key)
    }
}
