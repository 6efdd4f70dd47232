//! Common source code fixtures for tests.

pub const GOOGLE_ADD: &str = r#"
def add(a: int, b: int) -> int:
    """Add two numbers.

    Args:
        a (int): first operand
        b (int): second operand

    Returns:
        int: the sum
    """
    return a + b
"#;

pub const NUMPY_ADD: &str = r#"
def add(a: int, b: int) -> int:
    """Add two numbers.

    Parameters
    ----------
    a : int
        first operand
    b : int
        second operand

    Returns
    -------
    int
        the sum
    """
    return a + b
"#;

pub const SPHINX_ADD: &str = r#"
def add(a: int, b: int) -> int:
    """Add two numbers.

    :param a: first operand
    :type a: int
    :param b: second operand
    :type b: int
    :returns: the sum
    :rtype: int
    """
    return a + b
"#;

pub const SHAPES: &str = r#"
"""Geometric shapes."""

from abc import ABC, abstractmethod

PI = 3.14159


class Shape(ABC):
    """A closed figure."""

    @abstractmethod
    def area(self) -> float:
        ...

    def describe(self) -> str:
        return "shape with area " + str(self.area())
"#;

pub const CIRCLE: &str = r#"
from .shapes import Shape, PI


class Circle(Shape):
    def __init__(self, radius: float):
        self.radius = radius

    def area(self) -> float:
        return PI * self.radius ** 2

    def describe(self) -> str:
        text = super().describe()
        return text.upper()
"#;

pub const BROKEN: &str = "def broken(:\n    pass\n";

pub const SERVICE: &str = r#"
import json
import logging as log
from collections import OrderedDict

logger = log.getLogger(__name__)


class Service:
    retries: int = 3

    def __init__(self, name):
        self.name = name
        self._cache = OrderedDict()

    @property
    def label(self):
        return self.name.title()

    @staticmethod
    def encode(payload):
        return json.dumps(payload)

    def run(self):
        logger.info("running")
        self.encode({})
        return self.label
"#;
